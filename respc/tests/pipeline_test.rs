mod common;

use common::*;
use respc::{cmd, pipe, Client, Connection, RedisError};

fn transaction(args: &[String]) -> Response {
    match args[0].as_str() {
        "MULTI" => reply(ok()),
        "EXEC" => reply(array(vec![ok(), int(1), bulk("1")])),
        _ => reply(status("QUEUED")),
    }
}

#[tokio::test]
async fn test_pipeline_replies_in_order() {
    let server = TestServer::new(|args| match args[0].as_str() {
        "INCR" => reply(int(2)),
        "GET" => reply(bulk("2")),
        _ => basic(args),
    })
    .await;
    let mut client = Client::connect(server.config()).await.expect("connect");

    let (counter, text): (i64, String) = pipe()
        .cmd(cmd("SET").arg("a").arg(1))
        .ignore()
        .cmd(cmd("INCR").arg("a"))
        .cmd(cmd("GET").arg("a"))
        .query(&mut client)
        .await
        .expect("pipeline");

    assert_eq!((counter, text.as_str()), (2, "2"));
    assert_eq!(
        server.commands(),
        vec![
            strings(&["SET", "a", "1"]),
            strings(&["INCR", "a"]),
            strings(&["GET", "a"]),
        ]
    );
}

#[tokio::test]
async fn test_pipeline_error_fails_the_batch() {
    let server = TestServer::new(|args| match args[0].as_str() {
        "BOGUS" => reply(err("ERR unknown command 'BOGUS'")),
        _ => basic(args),
    })
    .await;
    let mut client = Client::connect(server.config()).await.expect("connect");

    let result: respc::Result<Vec<String>> = pipe()
        .cmd(cmd("SET").arg("a").arg("b"))
        .cmd(cmd("BOGUS"))
        .cmd(cmd("PING"))
        .query(&mut client)
        .await;
    assert_eq!(result.unwrap_err().code(), Some("ERR"));

    // every reply of the batch was consumed
    assert_eq!(client.ping().await.expect("ping"), "PONG");
}

#[tokio::test]
async fn test_atomic_pipeline_wraps_in_multi_exec() {
    let server = TestServer::new(transaction).await;
    let mut client = Client::connect(server.config()).await.expect("connect");

    let (counter, value): (i64, String) = pipe()
        .atomic()
        .cmd(cmd("SET").arg("key").arg("value"))
        .ignore()
        .cmd(cmd("INCR").arg("counter"))
        .cmd(cmd("GET").arg("counter"))
        .query(&mut client)
        .await
        .expect("transaction");

    assert_eq!(counter, 1);
    assert_eq!(value, "1");
    let names: Vec<String> = server.commands().into_iter().map(|c| c[0].clone()).collect();
    assert_eq!(names, strings(&["MULTI", "SET", "INCR", "GET", "EXEC"]));
}

#[tokio::test]
async fn test_aborted_transaction() {
    let server = TestServer::new(|args| match args[0].as_str() {
        "EXEC" => reply(nil()),
        _ => transaction(args),
    })
    .await;
    let mut client = Client::connect(server.config()).await.expect("connect");

    let result: respc::Result<Vec<String>> = pipe()
        .atomic()
        .cmd(cmd("GET").arg("watched"))
        .query(&mut client)
        .await;
    assert!(matches!(result, Err(RedisError::TransactionAborted)));
}

#[tokio::test]
async fn test_queue_error_is_reported_instead_of_execabort() {
    let server = TestServer::new(|args| match args[0].as_str() {
        "BOGUS" => reply(err("ERR unknown command 'BOGUS'")),
        "EXEC" => reply(err(
            "EXECABORT Transaction discarded because of previous errors.",
        )),
        _ => transaction(args),
    })
    .await;
    let mut client = Client::connect(server.config()).await.expect("connect");

    let result: respc::Result<Vec<String>> = pipe()
        .atomic()
        .cmd(cmd("SET").arg("a").arg("b"))
        .cmd(cmd("BOGUS"))
        .query(&mut client)
        .await;
    match result {
        Err(RedisError::Server(e)) => assert_eq!(e.to_string(), "ERR unknown command 'BOGUS'"),
        other => panic!("Expected the queue error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pipeline_on_a_dedicated_connection() {
    let server = TestServer::new(transaction).await;
    let mut conn = Connection::open(&server.config()).await.expect("connect");

    let values: Vec<respc::Value> = pipe()
        .atomic()
        .cmd(cmd("SET").arg("a").arg("b"))
        .cmd(cmd("INCR").arg("c"))
        .cmd(cmd("GET").arg("c"))
        .query(&mut conn)
        .await
        .expect("transaction");
    assert_eq!(values.len(), 3);
    assert!(values[0].is_ok());
}

#[tokio::test]
async fn test_empty_pipeline_skips_the_server() {
    let server = TestServer::default_server().await;
    let mut client = Client::connect(server.config()).await.expect("connect");

    let values: Vec<String> = pipe().query(&mut client).await.expect("empty");
    assert!(values.is_empty());
    assert!(server.commands().is_empty());
}
