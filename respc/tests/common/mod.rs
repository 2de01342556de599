#![allow(dead_code)]

use redis_protocol::resp2::types::OwnedFrame as Frame;
use respc::resp::{FrameReader, RespHelper};
use respc::ConnectionConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// What the scripted server does with one received command
pub enum Response {
    Frames(Vec<Frame>),
    Delayed(Duration, Vec<Frame>),
    /// Hang up without answering
    Close,
    /// Answer nothing and keep reading
    Silent,
}

type Handler = Arc<dyn Fn(&[String]) -> Response + Send + Sync>;

/// A command as the server saw it, tagged with the connection number
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub conn: usize,
    pub args: Vec<String>,
}

/// In-process RESP server answering from a handler closure
pub struct TestServer {
    pub port: u16,
    received: Arc<Mutex<Vec<Received>>>,
    connections: Arc<AtomicUsize>,
    shutdown_sender: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn new<F>(handler: F) -> Self
    where
        F: Fn(&[String]) -> Response + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let handler: Handler = Arc::new(handler);
        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();

        let accept_received = Arc::clone(&received);
        let accept_connections = Arc::clone(&connections);
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_receiver => {}
                _ = async {
                    loop {
                        let Ok((socket, _)) = listener.accept().await else {
                            continue;
                        };
                        let conn = accept_connections.fetch_add(1, Ordering::SeqCst);
                        tokio::spawn(serve(
                            socket,
                            conn,
                            Arc::clone(&handler),
                            Arc::clone(&accept_received),
                        ));
                    }
                } => {}
            }
        });

        TestServer {
            port,
            received,
            connections,
            shutdown_sender: Some(shutdown_sender),
        }
    }

    /// A server that understands just enough to accept a handshake
    pub async fn default_server() -> Self {
        Self::new(basic).await
    }

    pub fn config(&self) -> ConnectionConfig {
        ConnectionConfig::new("127.0.0.1", self.port)
    }

    pub fn url(&self) -> String {
        format!("redis://127.0.0.1:{}", self.port)
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().expect("received log").clone()
    }

    /// Argument lists of every received command, in arrival order
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.received().into_iter().map(|r| r.args).collect()
    }

    pub fn last_command(&self) -> Vec<String> {
        self.commands().pop().unwrap_or_default()
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(sender) = self.shutdown_sender.take() {
            let _ = sender.send(());
        }
    }
}

async fn serve(
    socket: TcpStream,
    conn: usize,
    handler: Handler,
    received: Arc<Mutex<Vec<Received>>>,
) {
    let (read_half, mut write_half) = socket.into_split();
    let mut reader = FrameReader::new(read_half);

    loop {
        let Ok(frame) = reader.read_frame().await else {
            return;
        };
        let args = frame_args(frame);
        received.lock().expect("received log").push(Received {
            conn,
            args: args.clone(),
        });

        let frames = match handler(&args) {
            Response::Frames(frames) => frames,
            Response::Delayed(delay, frames) => {
                tokio::time::sleep(delay).await;
                frames
            }
            Response::Close => return,
            Response::Silent => continue,
        };
        for frame in frames {
            let bytes = RespHelper::encode_frame(&frame).expect("Failed to encode frame");
            if write_half.write_all(&bytes).await.is_err() {
                return;
            }
        }
    }
}

fn frame_args(frame: Frame) -> Vec<String> {
    match frame {
        Frame::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Frame::BulkString(b) | Frame::SimpleString(b) => {
                    String::from_utf8_lossy(&b).into_owned()
                }
                other => format!("{:?}", other),
            })
            .collect(),
        other => vec![format!("{:?}", other)],
    }
}

/// Answers PING, ECHO, AUTH, SELECT and QUIT; everything else gets `+OK`
pub fn basic(args: &[String]) -> Response {
    match args[0].to_uppercase().as_str() {
        "PING" => reply(status("PONG")),
        "ECHO" => reply(bulk(&args[1])),
        _ => reply(ok()),
    }
}

pub fn reply(frame: Frame) -> Response {
    Response::Frames(vec![frame])
}

pub fn ok() -> Frame {
    status("OK")
}

pub fn status(s: &str) -> Frame {
    Frame::SimpleString(s.as_bytes().to_vec())
}

pub fn bulk(s: &str) -> Frame {
    Frame::BulkString(s.as_bytes().to_vec())
}

pub fn int(i: i64) -> Frame {
    Frame::Integer(i)
}

pub fn nil() -> Frame {
    Frame::Null
}

pub fn err(s: &str) -> Frame {
    Frame::Error(s.into())
}

pub fn array(items: Vec<Frame>) -> Frame {
    Frame::Array(items)
}

pub fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
