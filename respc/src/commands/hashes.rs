use crate::args::ToArg;
use crate::client::Client;
use crate::cmd::cmd;
use crate::error::Result;
use crate::value::FromValue;

impl Client {
    /// True when the field is new, false when an existing field was updated
    pub async fn hset<K: ToArg, F: ToArg, V: ToArg>(
        &self,
        key: K,
        field: F,
        value: V,
    ) -> Result<bool> {
        self.query(cmd("HSET").arg(key).arg(field).arg(value)).await
    }

    pub async fn hsetnx<K: ToArg, F: ToArg, V: ToArg>(
        &self,
        key: K,
        field: F,
        value: V,
    ) -> Result<bool> {
        let c = cmd("HSETNX").arg(key).arg(field).arg(value);
        self.query(c).await
    }

    pub async fn hget<K: ToArg, F: ToArg, V: FromValue>(&self, key: K, field: F) -> Result<V> {
        self.query(cmd("HGET").arg(key).arg(field)).await
    }

    pub async fn hmset<K: ToArg, F: ToArg, V: ToArg>(
        &self,
        key: K,
        fields: &[(F,
        V)],
    ) -> Result<()> {
        let mut c = cmd("HMSET").arg(key);
        for (field, value) in fields {
            c = c.arg(field).arg(value);
        }
        self.query(c).await
    }

    pub async fn hmget<K, I, V>(&self, key: K, fields: I) -> Result<V>
    where
        K: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
        V: FromValue,
    {
        self.query(cmd("HMGET").arg(key).args(fields)).await
    }

    /// Decodes into a map, or a `Vec<(F, V)>` of field/value pairs
    pub async fn hgetall<K: ToArg, V: FromValue>(&self, key: K) -> Result<V> {
        self.query(cmd("HGETALL").arg(key)).await
    }

    pub async fn hdel<K, I>(&self, key: K, fields: I) -> Result<i64>
    where
        K: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.query(cmd("HDEL").arg(key).args(fields)).await
    }

    pub async fn hexists<K: ToArg, F: ToArg>(&self, key: K, field: F) -> Result<bool> {
        self.query(cmd("HEXISTS").arg(key).arg(field)).await
    }

    pub async fn hincrby<K: ToArg, F: ToArg>(
        &self,
        key: K,
        field: F,
        increment: i64,
    ) -> Result<i64> {
        let c = cmd("HINCRBY").arg(key).arg(field).arg(increment);
        self.query(c).await
    }

    pub async fn hkeys<K: ToArg, V: FromValue>(&self, key: K) -> Result<V> {
        self.query(cmd("HKEYS").arg(key)).await
    }

    pub async fn hvals<K: ToArg, V: FromValue>(&self, key: K) -> Result<V> {
        self.query(cmd("HVALS").arg(key)).await
    }

    pub async fn hlen<K: ToArg>(&self, key: K) -> Result<i64> {
        self.query(cmd("HLEN").arg(key)).await
    }
}
