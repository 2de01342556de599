use crate::args::ToArg;
use crate::client::Client;
use crate::cmd::cmd;
use crate::error::Result;
use crate::value::FromValue;

impl Client {
    pub async fn set<K: ToArg, V: ToArg>(&self, key: K, value: V) -> Result<()> {
        self.query(cmd("SET").arg(key).arg(value)).await
    }

    pub async fn get<K: ToArg, V: FromValue>(&self, key: K) -> Result<V> {
        self.query(cmd("GET").arg(key)).await
    }

    /// True when the key was set
    pub async fn setnx<K: ToArg, V: ToArg>(&self, key: K, value: V) -> Result<bool> {
        self.query(cmd("SETNX").arg(key).arg(value)).await
    }

    pub async fn setex<K: ToArg, V: ToArg>(&self, key: K, seconds: i64, value: V) -> Result<()> {
        let c = cmd("SETEX").arg(key).arg(seconds).arg(value);
        self.query(c).await
    }

    pub async fn mset<K: ToArg, V: ToArg>(&self, pairs: &[(K, V)]) -> Result<()> {
        let mut c = cmd("MSET");
        for (key, value) in pairs {
            c = c.arg(key).arg(value);
        }
        self.query(c).await
    }

    /// Sets nothing and returns false if any of the keys exists
    pub async fn msetnx<K: ToArg, V: ToArg>(&self, pairs: &[(K, V)]) -> Result<bool> {
        let mut c = cmd("MSETNX");
        for (key, value) in pairs {
            c = c.arg(key).arg(value);
        }
        self.query(c).await
    }

    pub async fn mget<I, V>(&self, keys: I) -> Result<V>
    where
        I: IntoIterator,
        I::Item: ToArg,
        V: FromValue,
    {
        self.query(cmd("MGET").args(keys)).await
    }

    pub async fn incr<K: ToArg>(&self, key: K) -> Result<i64> {
        self.query(cmd("INCR").arg(key)).await
    }

    pub async fn incrby<K: ToArg>(&self, key: K, increment: i64) -> Result<i64> {
        self.query(cmd("INCRBY").arg(key).arg(increment)).await
    }

    pub async fn decr<K: ToArg>(&self, key: K) -> Result<i64> {
        self.query(cmd("DECR").arg(key)).await
    }

    pub async fn decrby<K: ToArg>(&self, key: K, decrement: i64) -> Result<i64> {
        self.query(cmd("DECRBY").arg(key).arg(decrement)).await
    }

    /// Returns the length of the string after the append
    pub async fn append<K: ToArg, V: ToArg>(&self, key: K, value: V) -> Result<i64> {
        self.query(cmd("APPEND").arg(key).arg(value)).await
    }

    /// Old value, or `None` if the key did not exist
    pub async fn getset<K: ToArg, V: ToArg, R: FromValue>(
        &self,
        key: K,
        value: V,
    ) -> Result<Option<R>> {
        self.query(cmd("GETSET").arg(key).arg(value)).await
    }

    pub async fn strlen<K: ToArg>(&self, key: K) -> Result<i64> {
        self.query(cmd("STRLEN").arg(key)).await
    }

    pub async fn getrange<K: ToArg, V: FromValue>(
        &self,
        key: K,
        start: i64,
        end: i64,
    ) -> Result<V> {
        let c = cmd("GETRANGE").arg(key).arg(start).arg(end);
        self.query(c).await
    }

    /// Returns the length of the string after the write
    pub async fn setrange<K: ToArg, V: ToArg>(&self, key: K, offset: i64, value: V) -> Result<i64> {
        let c = cmd("SETRANGE").arg(key).arg(offset).arg(value);
        self.query(c).await
    }
}
