use std::collections::BTreeMap;
use std::fmt;

use crate::error::{RedisError, Result};
use crate::value::{FromValue, Value};

/// Reply of the TYPE command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    String,
    List,
    Set,
    ZSet,
    Hash,
    Stream,
    None,
}

impl FromValue for KeyType {
    fn from_value(v: Value) -> Result<Self> {
        let name = String::from_value(v)?;
        match name.as_str() {
            "string" => Ok(KeyType::String),
            "list" => Ok(KeyType::List),
            "set" => Ok(KeyType::Set),
            "zset" => Ok(KeyType::ZSet),
            "hash" => Ok(KeyType::Hash),
            "stream" => Ok(KeyType::Stream),
            "none" => Ok(KeyType::None),
            other => Err(RedisError::Type(format!("unknown key type: {}", other))),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyType::String => "string",
            KeyType::List => "list",
            KeyType::Set => "set",
            KeyType::ZSet => "zset",
            KeyType::Hash => "hash",
            KeyType::Stream => "stream",
            KeyType::None => "none",
        };
        write!(f, "{}", name)
    }
}

/// The INFO reply, split into `# Section` blocks of `key:value` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl ServerInfo {
    pub fn parse(text: &str) -> Self {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current = String::new();

        for line in text.lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.strip_prefix('#') {
                current = name.trim().to_lowercase();
                sections.entry(current.clone()).or_default();
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                sections
                    .entry(current.clone())
                    .or_default()
                    .insert(key.to_string(), value.to_string());
            }
        }

        Self { sections }
    }

    /// Look a field up in any section
    pub fn get(&self, key: &str) -> Option<&str> {
        self.sections
            .values()
            .find_map(|fields| fields.get(key))
            .map(String::as_str)
    }

    /// Section names are lower-cased, e.g. `server`, `keyspace`
    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(&name.to_lowercase())
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn redis_version(&self) -> Option<&str> {
        self.get("redis_version")
    }
}

impl FromValue for ServerInfo {
    fn from_value(v: Value) -> Result<Self> {
        Ok(ServerInfo::parse(&String::from_value(v)?))
    }
}
