use async_trait::async_trait;

use crate::cmd::Cmd;
use crate::error::Result;
use crate::value::Value;

/// Outcome of one reply: a value, or the error the server answered with.
pub type Reply = Result<Value>;

/// Anything that can carry commands to a server: a dedicated
/// [`crate::Connection`] or the multiplexed [`crate::Client`].
#[async_trait]
pub trait ConnectionLike: Send {
    /// Send one command and wait for its reply
    async fn req_command(&mut self, cmd: &Cmd) -> Result<Value>;

    /// Write `packed` as one unit and collect `count` replies.
    ///
    /// The outer error is a transport failure; server errors are reported
    /// per reply.
    async fn req_packed(&mut self, packed: Vec<u8>, count: usize) -> Result<Vec<Reply>>;
}
