use percent_encoding::percent_decode_str;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::error::RedisError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 6379;

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    /// Logical database selected right after connecting
    pub db: i64,
    /// ACL user name, only sent together with a password
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout: Option<Duration>,
    /// Bound on the wait for a reply; never applied to blocking commands
    pub response_timeout: Option<Duration>,
    /// Reopen the connection on the next request after it was lost
    pub reconnect: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db: 0,
            username: None,
            password: None,
            connect_timeout: None,
            response_timeout: None,
            reconnect: true,
        }
    }
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Parse `redis://[user][:password@]host[:port][/db]`
    pub fn from_url(input: &str) -> Result<Self, RedisError> {
        let url = Url::parse(input).map_err(|e| RedisError::InvalidUrl(e.to_string()))?;
        if url.scheme() != "redis" {
            return Err(RedisError::InvalidUrl(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }

        let host = match url.host_str() {
            Some(h) if !h.is_empty() => h.trim_matches(|c| c == '[' || c == ']').to_string(),
            _ => return Err(RedisError::InvalidUrl("missing host".to_string())),
        };

        let db = match url.path().trim_matches('/') {
            "" => 0,
            path => path
                .parse::<i64>()
                .map_err(|_| RedisError::InvalidUrl(format!("invalid database: {}", path)))?,
        };

        let username = match url.username() {
            "" => None,
            name => Some(decode_credential(name)?),
        };
        let password = url.password().map(decode_credential).transpose()?;

        Ok(Self {
            host,
            port: url.port().unwrap_or(DEFAULT_PORT),
            db,
            username,
            password,
            ..Self::default()
        })
    }

    pub fn with_db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_timeouts(mut self, connect: Option<Duration>, response: Option<Duration>) -> Self {
        self.connect_timeout = connect;
        self.response_timeout = response;
        self
    }

    pub fn with_reconnect(mut self, reconnect: bool) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// `host:port`, suitable for `TcpStream::connect`
    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Credentials in a url are percent-encoded, AUTH needs the raw text
fn decode_credential(raw: &str) -> Result<String, RedisError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| RedisError::InvalidUrl(format!("credentials are not utf-8: {}", e)))
}

impl FromStr for ConnectionConfig {
    type Err = RedisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_url(s)
    }
}
