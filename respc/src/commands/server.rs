use crate::client::Client;
use crate::cmd::cmd;
use crate::error::Result;
use crate::types::ServerInfo;

impl Client {
    /// Number of keys in the selected database
    pub async fn dbsize(&self) -> Result<i64> {
        self.query(cmd("DBSIZE")).await
    }

    pub async fn flushdb(&self) -> Result<()> {
        self.query(cmd("FLUSHDB")).await
    }

    pub async fn flushall(&self) -> Result<()> {
        self.query(cmd("FLUSHALL")).await
    }

    pub async fn info(&self) -> Result<ServerInfo> {
        self.query(cmd("INFO")).await
    }

    pub async fn info_section(&self, section: &str) -> Result<ServerInfo> {
        self.query(cmd("INFO").arg(section)).await
    }

    /// Unix time of the last successful save to disk
    pub async fn lastsave(&self) -> Result<i64> {
        self.query(cmd("LASTSAVE")).await
    }
}
