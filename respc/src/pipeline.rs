use std::collections::HashSet;
use std::iter;

use crate::cmd::{cmd, pack_commands, Cmd};
use crate::error::{RedisError, Result};
use crate::traits::ConnectionLike;
use crate::value::{FromValue, Value};

/// A batch of commands written in one go.
///
/// With [`Pipeline::atomic`] the batch is wrapped in MULTI/EXEC. On a shared
/// [`crate::Client`] the batch is never interleaved with other requests, but
/// WATCH only makes sense on a dedicated [`crate::Connection`].
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    commands: Vec<Cmd>,
    ignored: HashSet<usize>,
    atomic: bool,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atomic(&mut self) -> &mut Self {
        self.atomic = true;
        self
    }

    pub fn cmd(&mut self, cmd: Cmd) -> &mut Self {
        self.commands.push(cmd);
        self
    }

    /// Leave the reply of the last added command out of the result
    pub fn ignore(&mut self) -> &mut Self {
        if let Some(last) = self.commands.len().checked_sub(1) {
            self.ignored.insert(last);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.ignored.clear();
    }

    /// Run the batch and convert the array of replies
    pub async fn query<T, C>(&self, con: &mut C) -> Result<T>
    where
        T: FromValue,
        C: ConnectionLike + ?Sized,
    {
        let value = if self.commands.is_empty() {
            Value::Bulk(Vec::new())
        } else if self.atomic {
            self.exec_atomic(con).await?
        } else {
            self.exec_plain(con).await?
        };
        T::from_value(value)
    }

    async fn exec_plain<C: ConnectionLike + ?Sized>(&self, con: &mut C) -> Result<Value> {
        let packed = pack_commands(&self.commands)?;
        let replies = con.req_packed(packed, self.commands.len()).await?;

        let mut values = Vec::with_capacity(replies.len());
        for (idx, reply) in replies.into_iter().enumerate() {
            let value = reply?;
            if !self.ignored.contains(&idx) {
                values.push(value);
            }
        }
        Ok(Value::Bulk(values))
    }

    async fn exec_atomic<C: ConnectionLike + ?Sized>(&self, con: &mut C) -> Result<Value> {
        let multi = cmd("MULTI");
        let exec = cmd("EXEC");
        let packed = pack_commands(
            iter::once(&multi)
                .chain(self.commands.iter())
                .chain(iter::once(&exec)),
        )?;

        let mut replies = con.req_packed(packed, self.commands.len() + 2).await?;
        let exec_reply = replies
            .pop()
            .unwrap_or_else(|| Err(RedisError::Protocol("missing EXEC reply".to_string())));
        let queue_error = replies.into_iter().find_map(|reply| reply.err());

        match exec_reply {
            Ok(Value::Nil) => Err(RedisError::TransactionAborted),
            Ok(Value::Bulk(items)) => Ok(Value::Bulk(
                items
                    .into_iter()
                    .enumerate()
                    .filter(|(idx, _)| !self.ignored.contains(idx))
                    .map(|(_, value)| value)
                    .collect(),
            )),
            Ok(other) => Err(RedisError::type_mismatch("EXEC array", other)),
            Err(e) => Err(queue_error.unwrap_or(e)),
        }
    }
}

/// Start an empty pipeline
pub fn pipe() -> Pipeline {
    Pipeline::new()
}
