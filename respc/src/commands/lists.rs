use crate::args::ToArg;
use crate::client::Client;
use crate::cmd::cmd;
use crate::error::Result;
use crate::value::FromValue;

// The blocking pops take their timeout in whole seconds, 0 waits forever.
// While one of them waits, nothing else queued on the same client moves.

impl Client {
    /// Returns the length of the list after the push
    pub async fn lpush<K, I>(&self, key: K, values: I) -> Result<i64>
    where
        K: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.query(cmd("LPUSH").arg(key).args(values)).await
    }

    pub async fn rpush<K, I>(&self, key: K, values: I) -> Result<i64>
    where
        K: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.query(cmd("RPUSH").arg(key).args(values)).await
    }

    pub async fn lpop<K: ToArg, V: FromValue>(&self, key: K) -> Result<Option<V>> {
        self.query(cmd("LPOP").arg(key)).await
    }

    pub async fn rpop<K: ToArg, V: FromValue>(&self, key: K) -> Result<Option<V>> {
        self.query(cmd("RPOP").arg(key)).await
    }

    pub async fn llen<K: ToArg>(&self, key: K) -> Result<i64> {
        self.query(cmd("LLEN").arg(key)).await
    }

    pub async fn lrange<K: ToArg, V: FromValue>(&self, key: K, start: i64, stop: i64) -> Result<V> {
        let c = cmd("LRANGE").arg(key).arg(start).arg(stop);
        self.query(c).await
    }

    pub async fn lindex<K: ToArg, V: FromValue>(&self, key: K, index: i64) -> Result<Option<V>> {
        self.query(cmd("LINDEX").arg(key).arg(index)).await
    }

    /// Fails with `ERR index out of range` past the end of the list
    pub async fn lset<K: ToArg, V: ToArg>(&self, key: K, index: i64, value: V) -> Result<()> {
        self.query(cmd("LSET").arg(key).arg(index).arg(value)).await
    }

    /// count > 0 removes from the head, < 0 from the tail, 0 removes all
    pub async fn lrem<K: ToArg, V: ToArg>(&self, key: K, count: i64, value: V) -> Result<i64> {
        self.query(cmd("LREM").arg(key).arg(count).arg(value)).await
    }

    pub async fn ltrim<K: ToArg>(&self, key: K, start: i64, stop: i64) -> Result<()> {
        self.query(cmd("LTRIM").arg(key).arg(start).arg(stop)).await
    }

    pub async fn rpoplpush<S: ToArg, D: ToArg, V: FromValue>(
        &self,
        source: S,
        destination: D,
    ) -> Result<Option<V>> {
        let c = cmd("RPOPLPUSH").arg(source).arg(destination);
        self.query(c).await
    }

    /// `(list, element)` from the first non-empty list, `None` on timeout
    pub async fn blpop<I, V>(&self, keys: I, timeout: i64) -> Result<Option<(String, V)>>
    where
        I: IntoIterator,
        I::Item: ToArg,
        V: FromValue,
    {
        self.query(cmd("BLPOP").args(keys).arg(timeout)).await
    }

    pub async fn brpop<I, V>(&self, keys: I, timeout: i64) -> Result<Option<(String, V)>>
    where
        I: IntoIterator,
        I::Item: ToArg,
        V: FromValue,
    {
        self.query(cmd("BRPOP").args(keys).arg(timeout)).await
    }

    pub async fn brpoplpush<S: ToArg, D: ToArg, V: FromValue>(
        &self,
        source: S,
        destination: D,
        timeout: i64,
    ) -> Result<Option<V>> {
        let c = cmd("BRPOPLPUSH").arg(source).arg(destination).arg(timeout);
        self.query(c).await
    }

    /// Returns the new length, or -1 when `pivot` was not found
    pub async fn linsert_before<K: ToArg, P: ToArg, V: ToArg>(
        &self,
        key: K,
        pivot: P,
        value: V,
    ) -> Result<i64> {
        let c = cmd("LINSERT").arg(key).arg("BEFORE").arg(pivot).arg(value);
        self.query(c).await
    }

    pub async fn linsert_after<K: ToArg, P: ToArg, V: ToArg>(
        &self,
        key: K,
        pivot: P,
        value: V,
    ) -> Result<i64> {
        let c = cmd("LINSERT").arg(key).arg("AFTER").arg(pivot).arg(value);
        self.query(c).await
    }
}
