//! Multiplexed client.
//!
//! Every [`Client`] clone talks to one driver task that owns the socket.
//! Requests are written in the order the driver receives them and replies
//! are matched back in the same order, so concurrent callers get implicit
//! pipelining over a single connection.
//!
//! Blocking commands (BLPOP and friends) hold up every request queued behind
//! them until they return. Use a dedicated client for them.

use redis_protocol::resp2::types::OwnedFrame as Frame;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::cmd::{cmd, Cmd};
use crate::config::ConnectionConfig;
use crate::conn::Connection;
use crate::error::{RedisError, Result};
use crate::metrics::SharedMetrics;
use crate::resp::FrameReader;
use crate::traits::{ConnectionLike, Reply};
use crate::value::{FromValue, Value};

const REQUEST_QUEUE_SIZE: usize = 1024;

type ReplySender = oneshot::Sender<Result<Vec<Reply>>>;

struct Request {
    payload: Vec<u8>,
    replies: usize,
    close_after: bool,
    tx: ReplySender,
}

struct Pending {
    remaining: usize,
    replies: Vec<Reply>,
    close_after: bool,
    tx: ReplySender,
}

/// Cheaply cloneable handle to a shared connection
#[derive(Clone)]
pub struct Client {
    tx: mpsc::Sender<Request>,
    config: Arc<ConnectionConfig>,
    db: Arc<AtomicI64>,
    metrics: SharedMetrics,
}

impl Client {
    /// Open the connection right away, so connection errors surface here
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        let conn = Connection::open(&config).await?;
        Ok(Self::from_connection(conn, config))
    }

    /// Connect using a `redis://` url
    pub async fn open(url: &str) -> Result<Self> {
        Self::connect(ConnectionConfig::from_url(url)?).await
    }

    /// Drive an already opened connection. Must be called inside a tokio
    /// runtime.
    pub fn from_connection(conn: Connection, config: ConnectionConfig) -> Self {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE_SIZE);
        let db = Arc::new(AtomicI64::new(conn.db()));
        let metrics = SharedMetrics::new();
        let (reader, writer) = conn.into_split();

        let driver = Driver {
            config: config.clone(),
            db: Arc::clone(&db),
            rx,
            reader: Some(reader),
            writer: Some(writer),
            pending: VecDeque::new(),
            metrics: metrics.clone(),
        };
        tokio::spawn(driver.run());

        Self {
            tx,
            config: Arc::new(config),
            db,
            metrics,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Database the connection currently has selected
    pub fn db(&self) -> i64 {
        self.db.load(Ordering::SeqCst)
    }

    pub fn metrics(&self) -> &SharedMetrics {
        &self.metrics
    }

    /// Run any command and convert its reply
    pub async fn query<T: FromValue>(&self, cmd: Cmd) -> Result<T> {
        let value = self.request(&cmd).await?;
        T::from_value(value)
    }

    pub(crate) async fn request(&self, cmd: &Cmd) -> Result<Value> {
        let name = cmd.name();
        debug!("Sending {} with {} args", name, cmd.arg_count());
        self.metrics.command_sent(&name);

        let timeout = if cmd.is_blocking() {
            None
        } else {
            self.config.response_timeout
        };

        let reply = match self.execute(cmd.encode()?, 1, false, timeout).await {
            Ok(replies) => replies
                .into_iter()
                .next()
                .unwrap_or_else(|| Err(RedisError::Protocol("missing reply".to_string()))),
            Err(e) => Err(e),
        };

        match &reply {
            Ok(_) if name == "SELECT" => self.track_select(cmd),
            Ok(_) => {}
            Err(e) => {
                debug!("{} failed: {}", name, e);
                self.metrics.command_failed();
            }
        }
        reply
    }

    /// Remember the database of a successful SELECT so reconnects restore it
    fn track_select(&self, cmd: &Cmd) {
        let db = cmd.arg_at(0).and_then(|arg| atoi::atoi::<i64>(arg));
        match db {
            Some(db) => self.db.store(db, Ordering::SeqCst),
            None => warn!("Could not track the database of {:?}", cmd),
        }
    }

    async fn execute(
        &self,
        payload: Vec<u8>,
        replies: usize,
        close_after: bool,
        timeout: Option<Duration>,
    ) -> Result<Vec<Reply>> {
        let (tx, rx) = oneshot::channel();
        let request = Request {
            payload,
            replies,
            close_after,
            tx,
        };
        self.tx
            .send(request)
            .await
            .map_err(|_| RedisError::ConnectionClosed)?;

        let answer = match timeout {
            Some(timeout) => tokio::time::timeout(timeout, rx)
                .await
                .map_err(|_| RedisError::Timeout)?,
            None => rx.await,
        };
        answer.map_err(|_| RedisError::ConnectionClosed)?
    }

    /// Send QUIT and stop the driver once the server acknowledged it.
    /// Every clone of this client is closed afterwards.
    pub async fn quit(&self) -> Result<()> {
        self.metrics.command_sent("QUIT");
        let replies = self
            .execute(cmd("QUIT").encode()?, 1, true, self.config.response_timeout)
            .await?;
        for reply in replies {
            reply?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ConnectionLike for Client {
    async fn req_command(&mut self, cmd: &Cmd) -> Result<Value> {
        self.request(cmd).await
    }

    async fn req_packed(&mut self, packed: Vec<u8>, count: usize) -> Result<Vec<Reply>> {
        self.metrics.command_sent("PIPELINE");
        let timeout = self.config.response_timeout;
        self.execute(packed, count, false, timeout).await
    }
}

struct Driver {
    config: ConnectionConfig,
    db: Arc<AtomicI64>,
    rx: mpsc::Receiver<Request>,
    reader: Option<FrameReader<OwnedReadHalf>>,
    writer: Option<OwnedWriteHalf>,
    pending: VecDeque<Pending>,
    metrics: SharedMetrics,
}

impl Driver {
    async fn run(mut self) {
        loop {
            tokio::select! {
                request = self.rx.recv() => match request {
                    Some(request) => self.dispatch(request).await,
                    None => break,
                },
                frame = read_next(&mut self.reader), if !self.pending.is_empty() => {
                    if self.on_frame(frame) {
                        break;
                    }
                }
            }
        }

        self.fail_pending(|| RedisError::ConnectionClosed);
        debug!("Client driver stopped");
    }

    async fn dispatch(&mut self, request: Request) {
        if self.writer.is_none() {
            if let Err(e) = self.reconnect().await {
                let _ = request.tx.send(Err(e));
                return;
            }
        }

        let written = match self.writer.as_mut() {
            Some(writer) => writer.write_all(&request.payload).await,
            None => {
                let _ = request.tx.send(Err(RedisError::ConnectionClosed));
                return;
            }
        };

        match written {
            Ok(()) => {
                self.metrics.bytes_written(request.payload.len());
                self.metrics.request_started();
                self.pending.push_back(Pending {
                    remaining: request.replies,
                    replies: Vec::with_capacity(request.replies),
                    close_after: request.close_after,
                    tx: request.tx,
                });
            }
            Err(e) => {
                error!("Error writing request: {}", e);
                let reason = e.to_string();
                let _ = request.tx.send(Err(RedisError::Io(e)));
                self.disconnect(&reason);
            }
        }
    }

    /// Returns true once the driver should stop
    fn on_frame(&mut self, frame: Result<Frame>) -> bool {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Connection lost: {}", e);
                self.disconnect(&e.to_string());
                return false;
            }
        };

        let reply = Value::from_frame(frame);
        let Some(head) = self.pending.front_mut() else {
            warn!("Dropping reply without a pending request");
            return false;
        };

        head.replies.push(reply);
        head.remaining = head.remaining.saturating_sub(1);
        if head.remaining > 0 {
            return false;
        }

        let Some(done) = self.pending.pop_front() else {
            return false;
        };
        self.metrics.request_finished();
        let _ = done.tx.send(Ok(done.replies));

        if done.close_after {
            info!("Connection closed by QUIT");
            self.reader = None;
            self.writer = None;
            return true;
        }
        false
    }

    async fn reconnect(&mut self) -> Result<()> {
        if !self.config.reconnect {
            return Err(RedisError::ConnectionClosed);
        }

        let mut config = self.config.clone();
        config.db = self.db.load(Ordering::SeqCst);
        info!("Reconnecting to {} (db {})", config.addr(), config.db);

        let conn = Connection::open(&config).await?;
        let (reader, writer) = conn.into_split();
        self.reader = Some(reader);
        self.writer = Some(writer);
        self.metrics.reconnected();
        Ok(())
    }

    fn disconnect(&mut self, reason: &str) {
        self.reader = None;
        self.writer = None;
        self.fail_pending(|| RedisError::ConnectionLost(reason.to_string()));
    }

    fn fail_pending(&mut self, err: impl Fn() -> RedisError) {
        for pending in self.pending.drain(..) {
            self.metrics.request_finished();
            let _ = pending.tx.send(Err(err()));
        }
    }
}

async fn read_next(reader: &mut Option<FrameReader<OwnedReadHalf>>) -> Result<Frame> {
    match reader {
        Some(reader) => reader.read_frame().await,
        None => std::future::pending().await,
    }
}
