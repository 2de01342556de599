use crate::args::ToArg;
use crate::client::Client;
use crate::cmd::cmd;
use crate::error::Result;
use crate::value::FromValue;

impl Client {
    /// Returns the number of members that were not already present
    pub async fn sadd<K, I>(&self, key: K, members: I) -> Result<i64>
    where
        K: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.query(cmd("SADD").arg(key).args(members)).await
    }

    pub async fn srem<K, I>(&self, key: K, members: I) -> Result<i64>
    where
        K: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.query(cmd("SREM").arg(key).args(members)).await
    }

    pub async fn smembers<K: ToArg, V: FromValue>(&self, key: K) -> Result<V> {
        self.query(cmd("SMEMBERS").arg(key)).await
    }

    pub async fn sismember<K: ToArg, M: ToArg>(&self, key: K, member: M) -> Result<bool> {
        self.query(cmd("SISMEMBER").arg(key).arg(member)).await
    }

    pub async fn scard<K: ToArg>(&self, key: K) -> Result<i64> {
        self.query(cmd("SCARD").arg(key)).await
    }

    pub async fn spop<K: ToArg, V: FromValue>(&self, key: K) -> Result<Option<V>> {
        self.query(cmd("SPOP").arg(key)).await
    }

    pub async fn srandmember<K: ToArg, V: FromValue>(&self, key: K) -> Result<Option<V>> {
        self.query(cmd("SRANDMEMBER").arg(key)).await
    }

    /// False when `member` is not in `source`
    pub async fn smove<S: ToArg, D: ToArg, M: ToArg>(
        &self,
        source: S,
        destination: D,
        member: M,
    ) -> Result<bool> {
        let c = cmd("SMOVE").arg(source).arg(destination).arg(member);
        self.query(c).await
    }

    pub async fn sinter<I, V>(&self, keys: I) -> Result<V>
    where
        I: IntoIterator,
        I::Item: ToArg,
        V: FromValue,
    {
        self.query(cmd("SINTER").args(keys)).await
    }

    /// Returns the size of the stored set
    pub async fn sinterstore<D, I>(&self, destination: D, keys: I) -> Result<i64>
    where
        D: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        let c = cmd("SINTERSTORE").arg(destination).args(keys);
        self.query(c).await
    }

    pub async fn sunion<I, V>(&self, keys: I) -> Result<V>
    where
        I: IntoIterator,
        I::Item: ToArg,
        V: FromValue,
    {
        self.query(cmd("SUNION").args(keys)).await
    }

    pub async fn sunionstore<D, I>(&self, destination: D, keys: I) -> Result<i64>
    where
        D: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        let c = cmd("SUNIONSTORE").arg(destination).args(keys);
        self.query(c).await
    }

    pub async fn sdiff<I, V>(&self, keys: I) -> Result<V>
    where
        I: IntoIterator,
        I::Item: ToArg,
        V: FromValue,
    {
        self.query(cmd("SDIFF").args(keys)).await
    }

    pub async fn sdiffstore<D, I>(&self, destination: D, keys: I) -> Result<i64>
    where
        D: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        let c = cmd("SDIFFSTORE").arg(destination).args(keys);
        self.query(c).await
    }
}
