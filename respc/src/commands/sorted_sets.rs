use crate::args::{ScoreBound, ToArg, ZStoreOptions};
use crate::client::Client;
use crate::cmd::{cmd, Cmd};
use crate::error::Result;
use crate::value::{from_pairs, FromValue};

impl Client {
    /// Returns 1 when `member` is new, 0 when only its score changed
    pub async fn zadd<K: ToArg, M: ToArg>(&self, key: K, score: f64, member: M) -> Result<i64> {
        let c = cmd("ZADD").arg(key).arg(score).arg(member);
        self.query(c).await
    }

    pub async fn zadd_multiple<K: ToArg, M: ToArg>(
        &self,
        key: K,
        members: &[(f64,
        M)],
    ) -> Result<i64> {
        let mut c = cmd("ZADD").arg(key);
        for (score, member) in members {
            c = c.arg(score).arg(member);
        }
        self.query(c).await
    }

    pub async fn zrem<K, I>(&self, key: K, members: I) -> Result<i64>
    where
        K: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.query(cmd("ZREM").arg(key).args(members)).await
    }

    /// Returns the new score
    pub async fn zincrby<K: ToArg, M: ToArg>(
        &self,
        key: K,
        increment: f64,
        member: M,
    ) -> Result<f64> {
        let c = cmd("ZINCRBY").arg(key).arg(increment).arg(member);
        self.query(c).await
    }

    /// `None` when the key or the member does not exist
    pub async fn zrank<K: ToArg, M: ToArg>(&self, key: K, member: M) -> Result<Option<i64>> {
        self.query(cmd("ZRANK").arg(key).arg(member)).await
    }

    pub async fn zrevrank<K: ToArg, M: ToArg>(&self, key: K, member: M) -> Result<Option<i64>> {
        self.query(cmd("ZREVRANK").arg(key).arg(member)).await
    }

    pub async fn zrange<K: ToArg, V: FromValue>(&self, key: K, start: i64, stop: i64) -> Result<V> {
        let c = cmd("ZRANGE").arg(key).arg(start).arg(stop);
        self.query(c).await
    }

    pub async fn zrange_withscores<K: ToArg, M: FromValue>(
        &self,
        key: K,
        start: i64,
        stop: i64,
    ) -> Result<Vec<(M, f64)>> {
        let c = cmd("ZRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .arg("WITHSCORES");
        self.query_pairs(c).await
    }

    pub async fn zrevrange<K: ToArg, V: FromValue>(
        &self,
        key: K,
        start: i64,
        stop: i64,
    ) -> Result<V> {
        let c = cmd("ZREVRANGE").arg(key).arg(start).arg(stop);
        self.query(c).await
    }

    pub async fn zrevrange_withscores<K: ToArg, M: FromValue>(
        &self,
        key: K,
        start: i64,
        stop: i64,
    ) -> Result<Vec<(M, f64)>> {
        self.query_pairs(
            cmd("ZREVRANGE")
                .arg(key)
                .arg(start)
                .arg(stop)
                .arg("WITHSCORES"),
        )
        .await
    }

    /// `limit` is `(offset, count)`
    pub async fn zrangebyscore<K, V>(
        &self,
        key: K,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
        limit: Option<(i64, i64)>,
    ) -> Result<V>
    where
        K: ToArg,
        V: FromValue,
    {
        let c = cmd("ZRANGEBYSCORE").arg(key).arg(min.into()).arg(max.into());
        self.query(with_limit(c, limit)).await
    }

    pub async fn zrangebyscore_withscores<K, M>(
        &self,
        key: K,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
        limit: Option<(i64, i64)>,
    ) -> Result<Vec<(M, f64)>>
    where
        K: ToArg,
        M: FromValue,
    {
        let c = cmd("ZRANGEBYSCORE")
            .arg(key)
            .arg(min.into())
            .arg(max.into())
            .arg("WITHSCORES");
        self.query_pairs(with_limit(c, limit)).await
    }

    pub async fn zcount<K: ToArg>(
        &self,
        key: K,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
    ) -> Result<i64> {
        let c = cmd("ZCOUNT").arg(key).arg(min.into()).arg(max.into());
        self.query(c).await
    }

    pub async fn zcard<K: ToArg>(&self, key: K) -> Result<i64> {
        self.query(cmd("ZCARD").arg(key)).await
    }

    pub async fn zscore<K: ToArg, M: ToArg>(&self, key: K, member: M) -> Result<Option<f64>> {
        self.query(cmd("ZSCORE").arg(key).arg(member)).await
    }

    /// Returns the number of removed members
    pub async fn zremrangebyrank<K: ToArg>(&self, key: K, start: i64, stop: i64) -> Result<i64> {
        let c = cmd("ZREMRANGEBYRANK").arg(key).arg(start).arg(stop);
        self.query(c).await
    }

    pub async fn zremrangebyscore<K: ToArg>(
        &self,
        key: K,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
    ) -> Result<i64> {
        self.query(
            cmd("ZREMRANGEBYSCORE")
                .arg(key)
                .arg(min.into())
                .arg(max.into()),
        )
        .await
    }

    /// Returns the size of the stored sorted set
    pub async fn zunionstore<D, I>(
        &self,
        destination: D,
        keys: I,
        options: &ZStoreOptions,
    ) -> Result<i64>
    where
        D: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        let c = zstore("ZUNIONSTORE", destination, keys, options);
        self.query(c).await
    }

    pub async fn zinterstore<D, I>(
        &self,
        destination: D,
        keys: I,
        options: &ZStoreOptions,
    ) -> Result<i64>
    where
        D: ToArg,
        I: IntoIterator,
        I::Item: ToArg,
    {
        let c = zstore("ZINTERSTORE", destination, keys, options);
        self.query(c).await
    }

    async fn query_pairs<M: FromValue>(&self, c: Cmd) -> Result<Vec<(M, f64)>> {
        from_pairs(self.request(&c).await?)
    }
}

fn with_limit(c: Cmd, limit: Option<(i64, i64)>) -> Cmd {
    match limit {
        Some((offset, count)) => c.arg("LIMIT").arg(offset).arg(count),
        None => c,
    }
}

/// ZUNIONSTORE / ZINTERSTORE take the number of source keys before the keys
fn zstore<D, I>(name: &str, destination: D, keys: I, options: &ZStoreOptions) -> Cmd
where
    D: ToArg,
    I: IntoIterator,
    I::Item: ToArg,
{
    let keys: Vec<Vec<u8>> = keys.into_iter().map(|k| k.to_arg()).collect();
    cmd(name)
        .arg(destination)
        .arg(keys.len())
        .raw_args(keys)
        .raw_args(options.to_args())
}
