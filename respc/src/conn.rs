use redis_protocol::resp2::types::OwnedFrame as Frame;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::cmd::Cmd;
use crate::config::ConnectionConfig;
use crate::error::{RedisError, Result};
use crate::resp::FrameReader;
use crate::traits::{ConnectionLike, Reply};
use crate::value::Value;

/// A single connection to the server: one request, then its replies.
///
/// This is the building block for [`crate::Client`] and [`crate::PubSub`];
/// use it directly when a command must own the socket, e.g. WATCH based
/// transactions.
pub struct Connection {
    reader: FrameReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    db: i64,
}

impl Connection {
    /// Connect and run the AUTH / SELECT handshake the config asks for
    pub async fn open(config: &ConnectionConfig) -> Result<Self> {
        let addr = config.addr();
        let socket = match config.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, TcpStream::connect(&addr))
                .await
                .map_err(|_| RedisError::Timeout)??,
            None => TcpStream::connect(&addr).await?,
        };
        socket.set_nodelay(true)?;
        info!("Connected to {}", addr);

        let mut conn = Self::new(socket);
        conn.handshake(config).await?;
        Ok(conn)
    }

    /// Wrap an already connected socket without any handshake
    pub fn new(socket: TcpStream) -> Self {
        let (read_half, writer) = socket.into_split();
        Self {
            reader: FrameReader::new(read_half),
            writer,
            db: 0,
        }
    }

    async fn handshake(&mut self, config: &ConnectionConfig) -> Result<()> {
        if let Some(password) = &config.password {
            let mut auth = Cmd::new("AUTH");
            if let Some(username) = &config.username {
                auth = auth.arg(username);
            }
            self.req_command(&auth.arg(password)).await?;
            debug!("Authenticated");
        }

        if config.db != 0 {
            self.select(config.db).await?;
        }
        Ok(())
    }

    pub async fn select(&mut self, db: i64) -> Result<()> {
        self.req_command(&Cmd::new("SELECT").arg(db)).await?;
        self.db = db;
        Ok(())
    }

    /// Database selected through this connection
    pub fn db(&self) -> i64 {
        self.db
    }

    pub async fn send_packed(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).await?;
        Ok(())
    }

    pub async fn read_frame(&mut self) -> Result<Frame> {
        self.reader.read_frame().await
    }

    pub async fn read_reply(&mut self) -> Result<Value> {
        Value::from_frame(self.read_frame().await?)
    }

    pub async fn req_command(&mut self, cmd: &Cmd) -> Result<Value> {
        debug!("Sending {} with {} args", cmd.name(), cmd.arg_count());
        self.send_packed(&cmd.encode()?).await?;
        self.read_reply().await
    }

    pub fn into_split(self) -> (FrameReader<OwnedReadHalf>, OwnedWriteHalf) {
        (self.reader, self.writer)
    }
}

#[async_trait::async_trait]
impl ConnectionLike for Connection {
    async fn req_command(&mut self, cmd: &Cmd) -> Result<Value> {
        Connection::req_command(self, cmd).await
    }

    async fn req_packed(&mut self, packed: Vec<u8>, count: usize) -> Result<Vec<Reply>> {
        self.send_packed(&packed).await?;
        let mut replies = Vec::with_capacity(count);
        for _ in 0..count {
            replies.push(Value::from_frame(self.read_frame().await?));
        }
        Ok(replies)
    }
}
