use std::fmt;
use thiserror::Error;

/// An error reply sent by the server, e.g. `ERR no such key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    /// Leading word of the reply (`ERR`, `WRONGTYPE`, `EXECABORT`, ...)
    pub code: String,
    /// Everything after the code
    pub detail: String,
}

impl ServerError {
    pub fn parse(text: &str) -> Self {
        match text.split_once(' ') {
            Some((code, detail)) => Self {
                code: code.to_string(),
                detail: detail.to_string(),
            },
            None => Self {
                code: text.to_string(),
                detail: String::new(),
            },
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.detail)
        }
    }
}

#[derive(Debug, Error)]
pub enum RedisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("{0}")]
    Server(ServerError),

    #[error("Type error: {0}")]
    Type(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error("Response timed out")]
    Timeout,

    #[error("Transaction aborted")]
    TransactionAborted,
}

impl RedisError {
    /// True when the failure came from the transport rather than from a reply.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            RedisError::Io(_)
                | RedisError::Protocol(_)
                | RedisError::ConnectionClosed
                | RedisError::ConnectionLost(_)
                | RedisError::Timeout
        )
    }

    /// The server error code, if this error is a server reply.
    pub fn code(&self) -> Option<&str> {
        match self {
            RedisError::Server(e) => Some(&e.code),
            _ => None,
        }
    }

    pub(crate) fn type_mismatch(expected: &str, got: impl fmt::Debug) -> Self {
        RedisError::Type(format!("expected {}, got {:?}", expected, got))
    }
}

pub type Result<T> = std::result::Result<T, RedisError>;
