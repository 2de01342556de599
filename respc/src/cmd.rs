use redis_protocol::resp2::types::OwnedFrame as Frame;

use crate::args::ToArg;
use crate::error::Result;
use crate::resp::RespHelper;

/// Commands that park the connection until data arrives or their own timeout
/// expires.
const BLOCKING_COMMANDS: &[&str] = &["BLPOP", "BRPOP", "BRPOPLPUSH"];

/// A single Redis command: the name followed by binary-safe arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    args: Vec<Vec<u8>>,
}

impl Cmd {
    pub fn new(name: &str) -> Self {
        Self {
            args: vec![name.as_bytes().to_vec()],
        }
    }

    pub fn arg<A: ToArg>(mut self, arg: A) -> Self {
        self.args.push(arg.to_arg());
        self
    }

    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.args.extend(args.into_iter().map(|a| a.to_arg()));
        self
    }

    pub(crate) fn raw_args(mut self, args: Vec<Vec<u8>>) -> Self {
        self.args.extend(args);
        self
    }

    /// Upper-cased command name
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.args[0]).to_uppercase()
    }

    /// Number of arguments, not counting the name
    pub fn arg_count(&self) -> usize {
        self.args.len() - 1
    }

    /// Argument at `idx`, not counting the name
    pub fn arg_at(&self, idx: usize) -> Option<&[u8]> {
        self.args.get(idx + 1).map(Vec::as_slice)
    }

    pub fn is_blocking(&self) -> bool {
        BLOCKING_COMMANDS.contains(&self.name().as_str())
    }

    pub fn to_frame(&self) -> Frame {
        Frame::Array(
            self.args
                .iter()
                .map(|a| Frame::BulkString(a.clone()))
                .collect(),
        )
    }

    /// RESP encoding of the command, ready to be written to a socket
    pub fn encode(&self) -> Result<Vec<u8>> {
        RespHelper::encode_frame(&self.to_frame())
    }
}

/// Start building a command, e.g. `cmd("SET").arg("k").arg("v")`.
pub fn cmd(name: &str) -> Cmd {
    Cmd::new(name)
}

/// Encode several commands back to back so they are written in one go.
pub fn pack_commands<'a>(cmds: impl IntoIterator<Item = &'a Cmd>) -> Result<Vec<u8>> {
    let mut packed = Vec::new();
    for cmd in cmds {
        packed.extend_from_slice(&cmd.encode()?);
    }
    Ok(packed)
}
