//! Asynchronous Redis client for tokio.
//!
//! ```no_run
//! # async fn demo() -> respc::Result<()> {
//! let client = respc::Client::open("redis://127.0.0.1:6379/11").await?;
//! client.set("foo", "bar").await?;
//! let value: Option<String> = client.get("foo").await?;
//! assert_eq!(value.as_deref(), Some("bar"));
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod client;
pub mod cmd;
mod commands;
pub mod config;
pub mod conn;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod pubsub;
pub mod resp;
pub mod traits;
pub mod types;
pub mod value;

pub use args::{Aggregate, ScoreBound, SortOptions, ToArg, ZStoreOptions};
pub use client::Client;
pub use cmd::{cmd, pack_commands, Cmd};
pub use config::ConnectionConfig;
pub use conn::Connection;
pub use error::{RedisError, Result, ServerError};
pub use metrics::SharedMetrics;
pub use pipeline::{pipe, Pipeline};
pub use pubsub::{PubSub, PubSubMessage};
pub use traits::ConnectionLike;
pub use types::{KeyType, ServerInfo};
pub use value::{from_value, FromValue, Value};
