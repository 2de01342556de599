use bytes::BytesMut;
use redis_protocol::error::{RedisProtocolError, RedisProtocolErrorKind};
use redis_protocol::resp2::types::OwnedFrame as Frame;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::error::{RedisError, Result};

const INITIAL_READ_CAPACITY: usize = 4096;

/// Helper functions for Redis RESP protocol
pub struct RespHelper;

impl RespHelper {
    /// Parse a frame from a byte buffer
    pub fn parse_frame(buffer: &[u8]) -> Result<Option<(Frame, usize)>> {
        if buffer.is_empty() {
            return Ok(None);
        }

        match redis_protocol::resp2::decode::decode(buffer) {
            Ok(Some((frame, len))) => Ok(Some((frame, len))),
            Ok(None) => Ok(None),
            Err(e) if Self::needs_more(&e) => Ok(None),
            Err(e) => Err(RedisError::Protocol(e.to_string())),
        }
    }

    /// Encode a frame to bytes
    pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>> {
        let mut size = match frame {
            Frame::Array(items) if items.len() > 10 => 4096,
            _ => 512,
        };

        loop {
            let mut buffer = vec![0; size];
            match redis_protocol::resp2::encode::encode(&mut buffer, frame, false) {
                Ok(len) => {
                    buffer.truncate(len);
                    return Ok(buffer);
                }
                Err(e) if Self::needs_more(&e) => size *= 2,
                Err(e) => return Err(RedisError::Protocol(e.to_string())),
            }
        }
    }

    fn needs_more(e: &RedisProtocolError) -> bool {
        matches!(e.kind(), RedisProtocolErrorKind::BufferTooSmall(_))
    }
}

/// Buffers one read half of a socket and yields whole frames.
///
/// `read_frame` is cancel safe: bytes already read stay in the buffer when
/// the future is dropped, so it can be raced in `tokio::select!`.
pub struct FrameReader<R> {
    reader: R,
    buffer: BytesMut,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: BytesMut::with_capacity(INITIAL_READ_CAPACITY),
        }
    }

    pub async fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some((frame, len)) = RespHelper::parse_frame(&self.buffer)? {
                let _ = self.buffer.split_to(len);
                trace!("Received frame: {:?}", frame);
                return Ok(frame);
            }

            if self.reader.read_buf(&mut self.buffer).await? == 0 {
                return if self.buffer.is_empty() {
                    Err(RedisError::ConnectionClosed)
                } else {
                    Err(RedisError::Protocol(
                        "connection closed in the middle of a frame".to_string(),
                    ))
                };
            }
        }
    }

    /// Bytes received but not yet consumed as a frame.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
