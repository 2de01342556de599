//! Runs against a real server on db 11, which is flushed by every test.
//!
//! `cargo test --test live_redis -- --ignored --test-threads=1`

use futures::StreamExt;
use respc::{
    cmd, pipe, Aggregate, Client, KeyType, PubSubMessage, RedisError, ScoreBound, ZStoreOptions,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

static SERIAL: Mutex<()> = Mutex::new(());

async fn setup() -> (MutexGuard<'static, ()>, Client) {
    let guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    dotenv::dotenv().ok();
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let client = Client::open(&url).await.expect("Failed to connect to redis");
    client.select(11).await.expect("select");
    client.flushdb().await.expect("flushdb");
    (guard, client)
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

#[tokio::test]
#[ignore]
async fn test_key_commands() {
    let (_guard, db) = setup().await;

    db.set("key1", "value").await.unwrap();
    assert_eq!(db.del(["key1"]).await.unwrap(), 1);
    assert_eq!(db.del(["key1"]).await.unwrap(), 0);

    for key in ["key1", "key2", "key3"] {
        db.set(key, "value").await.unwrap();
    }
    let keys: Vec<String> = db.keys("key*").await.unwrap();
    assert_eq!(sorted(keys), vec!["key1", "key2", "key3"]);
    let random: Option<String> = db.randomkey().await.unwrap();
    assert!(random.map_or(false, |k| k.starts_with("key")));
    assert_eq!(db.del(["key1", "key2", "key3"]).await.unwrap(), 3);

    db.set("key1", "value").await.unwrap();
    db.rename("key1", "key2").await.unwrap();
    let moved: Option<String> = db.get("key2").await.unwrap();
    assert_eq!(moved.as_deref(), Some("value"));
    let missing = db.rename("key1", "key2").await.unwrap_err();
    assert_eq!(missing.code(), Some("ERR"));

    db.set("key1", "value").await.unwrap();
    assert!(!db.renamenx("key1", "key2").await.unwrap());
    assert!(db.exists("key1").await.unwrap());
    assert_eq!(db.key_type("key1").await.unwrap(), KeyType::String);
    assert_eq!(db.key_type("nothing").await.unwrap(), KeyType::None);

    assert!(db.expire("key1", 2).await.unwrap());
    assert_eq!(db.ttl("key1").await.unwrap(), 2);
    assert!(db.persist("key1").await.unwrap());
    assert_eq!(db.ttl("key1").await.unwrap(), -1);

    assert!(db.move_key("key1", 13).await.unwrap());
    db.select(13).await.unwrap();
    assert!(db.exists("key1").await.unwrap());
    db.del(["key1"]).await.unwrap();
    db.select(11).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_string_commands() {
    let (_guard, db) = setup().await;

    assert!(db.setnx("key1", "value").await.unwrap());
    assert!(!db.setnx("key1", "value").await.unwrap());
    db.mset(&[("key2", "a"), ("key3", "b")]).await.unwrap();
    assert!(!db.msetnx(&[("key3", "c"), ("key4", "d")]).await.unwrap());
    let values: Vec<Option<String>> = db.mget(["key2", "key3", "key4"]).await.unwrap();
    assert_eq!(values, vec![Some("a".into()), Some("b".into()), None]);

    assert_eq!(db.incr("counter").await.unwrap(), 1);
    assert_eq!(db.incrby("counter", 10).await.unwrap(), 11);
    assert_eq!(db.decr("counter").await.unwrap(), 10);
    assert_eq!(db.decrby("counter", 5).await.unwrap(), 5);
    let counter: i64 = db.get("counter").await.unwrap();
    assert_eq!(counter, 5);

    assert_eq!(db.append("key1", "s").await.unwrap(), 6);
    let old: Option<String> = db.getset("key1", "new").await.unwrap();
    assert_eq!(old.as_deref(), Some("values"));
    let none: Option<String> = db.getset("fresh", "new").await.unwrap();
    assert_eq!(none, None);
    assert_eq!(db.strlen("key1").await.unwrap(), 3);
}

#[tokio::test]
#[ignore]
async fn test_hash_commands() {
    let (_guard, db) = setup().await;

    assert!(db.hset("key", "field1", "value1").await.unwrap());
    assert!(!db.hsetnx("key", "field1", "other").await.unwrap());
    db.hmset("key", &[("field2", "value2"), ("count", "1")]).await.unwrap();

    let value: Option<String> = db.hget("key", "field1").await.unwrap();
    assert_eq!(value.as_deref(), Some("value1"));
    let all: HashMap<String, String> = db.hgetall("key").await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(db.hincrby("key", "count", 4).await.unwrap(), 5);
    assert!(db.hexists("key", "field2").await.unwrap());
    assert_eq!(db.hdel("key", ["field2"]).await.unwrap(), 1);
    assert_eq!(db.hlen("key").await.unwrap(), 2);
    let keys: Vec<String> = db.hkeys("key").await.unwrap();
    assert_eq!(sorted(keys), vec!["count", "field1"]);
}

#[tokio::test]
#[ignore]
async fn test_list_commands() {
    let (_guard, db) = setup().await;

    db.rpush("key", ["value0", "value1", "value1", "value0"]).await.unwrap();
    assert_eq!(db.lrem("key", -1, "value0").await.unwrap(), 1);
    let items: Vec<String> = db.lrange("key", 0, -1).await.unwrap();
    assert_eq!(items, vec!["value0", "value1", "value1"]);

    db.lset("key", 0, "value2").await.unwrap();
    let err = db.lset("key", 5, "x").await.unwrap_err();
    assert_eq!(err.to_string(), "ERR index out of range");
    let missing: Option<String> = db.lindex("key", 7).await.unwrap();
    assert_eq!(missing, None);

    db.ltrim("key", 0, 1).await.unwrap();
    assert_eq!(db.llen("key").await.unwrap(), 2);
    let moved: Option<String> = db.rpoplpush("key", "key1").await.unwrap();
    assert_eq!(moved.as_deref(), Some("value1"));

    db.rpush("key1", ["key1.value0"]).await.unwrap();
    let popped: Option<(String, String)> = db.blpop(["key0", "key1"], 0).await.unwrap();
    assert_eq!(popped, Some(("key1".to_string(), "value1".to_string())));

    let timed_out: Option<(String, String)> = db.brpop(["key0"], 1).await.unwrap();
    assert_eq!(timed_out, None);
}

#[tokio::test]
#[ignore]
async fn test_set_commands() {
    let (_guard, db) = setup().await;

    assert_eq!(db.sadd("key0", ["a", "b", "c"]).await.unwrap(), 3);
    assert_eq!(db.sadd("key1", ["b", "c", "d"]).await.unwrap(), 3);
    assert_eq!(db.scard("key0").await.unwrap(), 3);
    assert!(db.sismember("key0", "a").await.unwrap());

    let inter: HashSet<String> = db.sinter(["key0", "key1"]).await.unwrap();
    let expected: HashSet<String> = ["b", "c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(inter, expected);
    let diff: Vec<String> = db.sdiff(["key0", "key1"]).await.unwrap();
    assert_eq!(diff, vec!["a"]);
    assert_eq!(db.sunionstore("out", ["key0", "key1"]).await.unwrap(), 4);

    assert!(db.smove("key0", "key1", "a").await.unwrap());
    assert_eq!(db.srem("key1", ["a", "zz"]).await.unwrap(), 1);
}

#[tokio::test]
#[ignore]
async fn test_sorted_set_commands() {
    let (_guard, db) = setup().await;

    for (score, member) in [(1.0, "value1"), (2.0, "value2"), (3.0, "value3"), (4.0, "value4")] {
        assert_eq!(db.zadd("key0", score, member).await.unwrap(), 1);
    }
    let members = [(3.0, "value3"), (4.0, "value4"), (5.0, "value5"), (6.0, "value6")];
    db.zadd_multiple("key1", &members).await.unwrap();

    let all = db.zcount("key0", ScoreBound::NegInf, ScoreBound::PosInf);
    assert_eq!(all.await.unwrap(), 4);
    let above = db.zcount("key0", ScoreBound::Exclusive(2.0), ScoreBound::PosInf);
    assert_eq!(above.await.unwrap(), 2);
    assert_eq!(db.zrank("key0", "value2").await.unwrap(), Some(1));
    assert_eq!(db.zrevrank("key0", "value1").await.unwrap(), Some(3));
    assert_eq!(db.zrank("key0", "value5").await.unwrap(), None);
    assert_eq!(db.zscore("key0", "value3").await.unwrap(), Some(3.0));

    let range: Vec<String> = db
        .zrangebyscore("key0", ScoreBound::Exclusive(1.0), 3.0, None)
        .await
        .unwrap();
    assert_eq!(range, vec!["value2", "value3"]);

    let options = ZStoreOptions::new().weights([2.0, 3.0]).aggregate(Aggregate::Max);
    assert_eq!(db.zunionstore("out", ["key0", "key1"], &options).await.unwrap(), 6);
    let scored: Vec<(String, f64)> = db.zrange_withscores("out", 0, -1).await.unwrap();
    assert_eq!(scored[2], ("value3".to_string(), 9.0));

    let plain = ZStoreOptions::new();
    assert_eq!(db.zinterstore("out", ["key0", "key1"], &plain).await.unwrap(), 2);
    assert_eq!(db.zincrby("out", -1.0, "value3").await.unwrap(), 5.0);
    assert_eq!(db.zremrangebyrank("key0", 0, 1).await.unwrap(), 2);
    let removed = db.zremrangebyscore("key1", 5.0, ScoreBound::PosInf);
    assert_eq!(removed.await.unwrap(), 2);
    let rev: Vec<String> = db.zrevrange("key1", 0, -1).await.unwrap();
    assert_eq!(rev, vec!["value4", "value3"]);
}

#[tokio::test]
#[ignore]
async fn test_connection_and_server_commands() {
    let (_guard, db) = setup().await;

    assert_eq!(db.ping().await.unwrap(), "PONG");
    let echoed: String = db.echo("Hello World").await.unwrap();
    assert_eq!(echoed, "Hello World");

    assert_eq!(db.dbsize().await.unwrap(), 0);
    db.mset(&[("key0", "value0"), ("key1", "value1"), ("key2", "value2")])
        .await
        .unwrap();
    assert_eq!(db.dbsize().await.unwrap(), 3);

    let info = db.info().await.unwrap();
    assert!(info.redis_version().is_some());
    assert!(db.lastsave().await.unwrap() > 0);
}

#[tokio::test]
#[ignore]
async fn test_transaction() {
    let (_guard, mut db) = setup().await;

    let values: Vec<i64> = pipe()
        .atomic()
        .cmd(cmd("SET").arg("counter").arg(1))
        .ignore()
        .cmd(cmd("INCR").arg("counter"))
        .query(&mut db)
        .await
        .unwrap();
    assert_eq!(values, vec![2]);

    let wrong: respc::Result<Vec<i64>> = pipe()
        .atomic()
        .cmd(cmd("INCR").arg("counter"))
        .cmd(cmd("NOSUCHCOMMAND"))
        .query(&mut db)
        .await;
    assert!(matches!(wrong, Err(RedisError::Server(_))));
}

#[tokio::test]
#[ignore]
async fn test_subscribe_and_psubscribe() {
    let (_guard, db) = setup().await;

    let mut pubsub = db.subscribe(["test"]).await.unwrap();
    assert_eq!(pubsub.next_message().await.unwrap().map(|m| m.kind()), Some("subscribe"));
    assert_eq!(db.publish("test", "Test Message").await.unwrap(), 1);
    match pubsub.next_message().await.unwrap() {
        Some(PubSubMessage::Message { payload, .. }) => {
            assert_eq!(payload.as_ref(), b"Test Message")
        }
        other => panic!("Expected a message, got {:?}", other),
    }
    pubsub.unsubscribe(["test"]).await.unwrap();
    assert_eq!(pubsub.next_message().await.unwrap().map(|m| m.kind()), Some("unsubscribe"));

    let mut patterns = db.pubsub().await.unwrap();
    patterns.psubscribe(["test.*"]).await.unwrap();
    let mut stream = Box::pin(patterns.into_stream());
    assert_eq!(stream.next().await.unwrap().unwrap().kind(), "psubscribe");
    db.publish("test.test", "Test Message").await.unwrap();
    let message = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("pmessage in time")
        .unwrap()
        .unwrap();
    assert_eq!(message.kind(), "pmessage");
}
