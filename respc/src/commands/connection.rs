use crate::args::ToArg;
use crate::client::Client;
use crate::cmd::cmd;
use crate::error::Result;
use crate::value::FromValue;

impl Client {
    pub async fn ping(&self) -> Result<String> {
        self.query(cmd("PING")).await
    }

    pub async fn echo<M: ToArg, V: FromValue>(&self, message: M) -> Result<V> {
        self.query(cmd("ECHO").arg(message)).await
    }

    /// Switch the shared connection to another database. The choice is kept
    /// across reconnects and applies to every clone of this client.
    pub async fn select(&self, db: i64) -> Result<()> {
        self.query(cmd("SELECT").arg(db)).await
    }

    /// Authenticate the shared connection. Reconnects authenticate with the
    /// password from the configuration.
    pub async fn auth<P: ToArg>(&self, password: P) -> Result<()> {
        self.query(cmd("AUTH").arg(password)).await
    }
}
