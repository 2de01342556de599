use bytes::Bytes;
use futures::stream::{self, Stream};
use std::collections::HashSet;
use tracing::debug;

use crate::args::ToArg;
use crate::client::Client;
use crate::cmd::{cmd, Cmd};
use crate::config::ConnectionConfig;
use crate::conn::Connection;
use crate::error::{RedisError, Result};
use crate::value::{FromValue, Value};

/// Anything a subscribed connection can receive
#[derive(Debug, Clone, PartialEq)]
pub enum PubSubMessage {
    Subscribe { channel: String, count: i64 },
    /// `channel` is `None` when unsubscribing while not subscribed at all
    Unsubscribe { channel: Option<String>, count: i64 },
    PSubscribe { pattern: String, count: i64 },
    PUnsubscribe { pattern: Option<String>, count: i64 },
    Message { channel: String, payload: Bytes },
    PMessage {
        pattern: String,
        channel: String,
        payload: Bytes,
    },
}

impl PubSubMessage {
    /// The message kind as the server names it
    pub fn kind(&self) -> &'static str {
        match self {
            PubSubMessage::Subscribe { .. } => "subscribe",
            PubSubMessage::Unsubscribe { .. } => "unsubscribe",
            PubSubMessage::PSubscribe { .. } => "psubscribe",
            PubSubMessage::PUnsubscribe { .. } => "punsubscribe",
            PubSubMessage::Message { .. } => "message",
            PubSubMessage::PMessage { .. } => "pmessage",
        }
    }

    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            PubSubMessage::Message { payload, .. } | PubSubMessage::PMessage { payload, .. } => {
                Some(payload)
            }
            _ => None,
        }
    }
}

impl FromValue for PubSubMessage {
    fn from_value(v: Value) -> Result<Self> {
        let mut items = v.into_sequence()?.into_iter();
        let mut next = || {
            items
                .next()
                .ok_or_else(|| RedisError::Type("truncated pubsub message".to_string()))
        };

        let kind = String::from_value(next()?)?.to_lowercase();
        match kind.as_str() {
            "subscribe" => Ok(PubSubMessage::Subscribe {
                channel: String::from_value(next()?)?,
                count: i64::from_value(next()?)?,
            }),
            "unsubscribe" => Ok(PubSubMessage::Unsubscribe {
                channel: Option::<String>::from_value(next()?)?,
                count: i64::from_value(next()?)?,
            }),
            "psubscribe" => Ok(PubSubMessage::PSubscribe {
                pattern: String::from_value(next()?)?,
                count: i64::from_value(next()?)?,
            }),
            "punsubscribe" => Ok(PubSubMessage::PUnsubscribe {
                pattern: Option::<String>::from_value(next()?)?,
                count: i64::from_value(next()?)?,
            }),
            "message" => Ok(PubSubMessage::Message {
                channel: String::from_value(next()?)?,
                payload: Bytes::from_value(next()?)?,
            }),
            "pmessage" => Ok(PubSubMessage::PMessage {
                pattern: String::from_value(next()?)?,
                channel: String::from_value(next()?)?,
                payload: Bytes::from_value(next()?)?,
            }),
            other => Err(RedisError::Type(format!(
                "unknown pubsub message kind: {}",
                other
            ))),
        }
    }
}

/// A connection in subscriber mode.
///
/// Subscription commands only write to the socket; their confirmations
/// arrive through [`PubSub::next_message`] like any other message.
pub struct PubSub {
    conn: Connection,
    channels: HashSet<String>,
    patterns: HashSet<String>,
}

impl PubSub {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        Ok(Self::new(Connection::open(config).await?))
    }

    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            channels: HashSet::new(),
            patterns: HashSet::new(),
        }
    }

    pub async fn subscribe<I>(&mut self, channels: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        let cmd = cmd("SUBSCRIBE").args(channels);
        if cmd.arg_count() == 0 {
            return Ok(());
        }
        self.send(cmd).await
    }

    /// Without channels, drops every channel subscription
    pub async fn unsubscribe<I>(&mut self, channels: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.send(cmd("UNSUBSCRIBE").args(channels)).await
    }

    pub async fn psubscribe<I>(&mut self, patterns: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        let cmd = cmd("PSUBSCRIBE").args(patterns);
        if cmd.arg_count() == 0 {
            return Ok(());
        }
        self.send(cmd).await
    }

    /// Without patterns, drops every pattern subscription
    pub async fn punsubscribe<I>(&mut self, patterns: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.send(cmd("PUNSUBSCRIBE").args(patterns)).await
    }

    async fn send(&mut self, cmd: Cmd) -> Result<()> {
        debug!("Sending {} with {} args", cmd.name(), cmd.arg_count());
        self.conn.send_packed(&cmd.encode()?).await
    }

    /// Wait for the next message. `None` means the server closed the
    /// connection.
    pub async fn next_message(&mut self) -> Result<Option<PubSubMessage>> {
        let frame = match self.conn.read_frame().await {
            Ok(frame) => frame,
            Err(RedisError::ConnectionClosed) => return Ok(None),
            Err(e) => return Err(e),
        };

        let message = PubSubMessage::from_value(Value::from_frame(frame)?)?;
        self.track(&message);
        Ok(Some(message))
    }

    fn track(&mut self, message: &PubSubMessage) {
        match message {
            PubSubMessage::Subscribe { channel, .. } => {
                self.channels.insert(channel.clone());
            }
            PubSubMessage::Unsubscribe { channel, .. } => {
                if let Some(channel) = channel {
                    self.channels.remove(channel);
                }
            }
            PubSubMessage::PSubscribe { pattern, .. } => {
                self.patterns.insert(pattern.clone());
            }
            PubSubMessage::PUnsubscribe { pattern, .. } => {
                if let Some(pattern) = pattern {
                    self.patterns.remove(pattern);
                }
            }
            PubSubMessage::Message { .. } | PubSubMessage::PMessage { .. } => {}
        }
    }

    /// Channels confirmed by the server
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(String::as_str)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    pub fn is_subscribed(&self) -> bool {
        !self.channels.is_empty() || !self.patterns.is_empty()
    }

    /// Turn the connection into a stream of messages. The stream ends when
    /// the server closes the connection or after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<PubSubMessage>> {
        stream::unfold(Some(self), |state| async move {
            let mut pubsub = state?;
            match pubsub.next_message().await {
                Ok(Some(message)) => Some((Ok(message), Some(pubsub))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}

impl Client {
    /// Returns the number of clients that received the message
    pub async fn publish<C: ToArg, M: ToArg>(&self, channel: C, message: M) -> Result<i64> {
        self.query(cmd("PUBLISH").arg(channel).arg(message)).await
    }

    /// Open a dedicated subscriber connection with this client's settings
    pub async fn pubsub(&self) -> Result<PubSub> {
        let config = self.config().clone().with_db(self.db());
        PubSub::connect(&config).await
    }

    /// Open a subscriber connection and subscribe to `channels`
    pub async fn subscribe<I>(&self, channels: I) -> Result<PubSub>
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        let mut pubsub = self.pubsub().await?;
        pubsub.subscribe(channels).await?;
        Ok(pubsub)
    }
}
