use crate::args::{SortOptions, ToArg};
use crate::client::Client;
use crate::cmd::cmd;
use crate::error::Result;
use crate::types::KeyType;
use crate::value::FromValue;

impl Client {
    /// Returns the number of keys that were removed
    pub async fn del<I>(&self, keys: I) -> Result<i64>
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.query(cmd("DEL").args(keys)).await
    }

    pub async fn exists<K: ToArg>(&self, key: K) -> Result<bool> {
        self.query(cmd("EXISTS").arg(key)).await
    }

    pub async fn keys<P: ToArg, V: FromValue>(&self, pattern: P) -> Result<V> {
        self.query(cmd("KEYS").arg(pattern)).await
    }

    /// Fails with `ERR no such key` when `key` does not exist
    pub async fn rename<K: ToArg, N: ToArg>(&self, key: K, new_key: N) -> Result<()> {
        self.query(cmd("RENAME").arg(key).arg(new_key)).await
    }

    /// False when `new_key` already exists
    pub async fn renamenx<K: ToArg, N: ToArg>(&self, key: K, new_key: N) -> Result<bool> {
        self.query(cmd("RENAMENX").arg(key).arg(new_key)).await
    }

    pub async fn key_type<K: ToArg>(&self, key: K) -> Result<KeyType> {
        self.query(cmd("TYPE").arg(key)).await
    }

    /// MOVE the key to another database
    pub async fn move_key<K: ToArg>(&self, key: K, db: i64) -> Result<bool> {
        self.query(cmd("MOVE").arg(key).arg(db)).await
    }

    pub async fn expire<K: ToArg>(&self, key: K, seconds: i64) -> Result<bool> {
        self.query(cmd("EXPIRE").arg(key).arg(seconds)).await
    }

    /// `timestamp` is in unix seconds
    pub async fn expire_at<K: ToArg>(&self, key: K, timestamp: i64) -> Result<bool> {
        self.query(cmd("EXPIREAT").arg(key).arg(timestamp)).await
    }

    pub async fn expire_at_time<K: ToArg>(
        &self,
        key: K,
        when: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool> {
        self.expire_at(key, when.timestamp()).await
    }

    /// Seconds left; -1 without expiry, -2 for a missing key
    pub async fn ttl<K: ToArg>(&self, key: K) -> Result<i64> {
        self.query(cmd("TTL").arg(key)).await
    }

    pub async fn persist<K: ToArg>(&self, key: K) -> Result<bool> {
        self.query(cmd("PERSIST").arg(key)).await
    }

    pub async fn randomkey<V: FromValue>(&self) -> Result<Option<V>> {
        self.query(cmd("RANDOMKEY")).await
    }

    pub async fn sort<K: ToArg, V: FromValue>(&self, key: K, options: &SortOptions) -> Result<V> {
        let c = cmd("SORT").arg(key).raw_args(options.to_args());
        self.query(c).await
    }

    /// SORT ... STORE; returns the number of stored elements
    pub async fn sort_store<K: ToArg, D: ToArg>(
        &self,
        key: K,
        options: &SortOptions,
        destination: D,
    ) -> Result<i64> {
        self.query(
            cmd("SORT")
                .arg(key)
                .raw_args(options.to_args())
                .arg("STORE")
                .arg(destination),
        )
        .await
    }
}
