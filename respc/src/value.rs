//! Decoded replies and conversions into Rust types.

use atoi::FromRadix10SignedChecked;
use bytes::Bytes;
use redis_protocol::resp2::types::OwnedFrame as Frame;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::{RedisError, Result, ServerError};

/// A reply from the server. Error replies never become a `Value`; they are
/// turned into [`RedisError::Server`] while decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Int(i64),
    Data(Bytes),
    Status(String),
    Bulk(Vec<Value>),
}

impl Value {
    /// Convert a decoded frame, mapping error replies to `RedisError::Server`
    pub fn from_frame(frame: Frame) -> Result<Value> {
        match frame {
            Frame::SimpleString(s) => Ok(Value::Status(String::from_utf8_lossy(&s).into_owned())),
            Frame::BulkString(b) => Ok(Value::Data(Bytes::from(b))),
            Frame::Integer(i) => Ok(Value::Int(i)),
            Frame::Null => Ok(Value::Nil),
            Frame::Error(e) => Err(RedisError::Server(ServerError::parse(&e))),
            Frame::Array(items) => items
                .into_iter()
                .map(Value::from_frame)
                .collect::<Result<Vec<_>>>()
                .map(Value::Bulk),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// True for the `+OK` status reply.
    pub fn is_ok(&self) -> bool {
        matches!(self, Value::Status(s) if s == "OK")
    }

    /// Items of an array reply. `Nil` is treated as empty.
    pub fn into_sequence(self) -> Result<Vec<Value>> {
        match self {
            Value::Bulk(items) => Ok(items),
            Value::Nil => Ok(Vec::new()),
            other => Err(RedisError::type_mismatch("array", other)),
        }
    }
}

/// Conversion from a reply into a Rust type.
pub trait FromValue: Sized {
    fn from_value(v: Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(v: Value) -> Result<Self> {
        Ok(v)
    }
}

impl FromValue for () {
    fn from_value(_: Value) -> Result<Self> {
        Ok(())
    }
}

fn parse_int<T: FromRadix10SignedChecked>(text: &[u8]) -> Option<T> {
    match T::from_radix_10_signed_checked(text) {
        (Some(n), used) if used == text.len() && used > 0 => Some(n),
        _ => None,
    }
}

macro_rules! from_value_int {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(v: Value) -> Result<Self> {
                    match v {
                        Value::Int(i) => <$t>::try_from(i)
                            .map_err(|_| RedisError::type_mismatch(stringify!($t), i)),
                        Value::Data(ref b) => parse_int::<$t>(b)
                            .ok_or_else(|| RedisError::type_mismatch(stringify!($t), &v)),
                        Value::Status(ref s) => parse_int::<$t>(s.as_bytes())
                            .ok_or_else(|| RedisError::type_mismatch(stringify!($t), &v)),
                        other => Err(RedisError::type_mismatch(stringify!($t), other)),
                    }
                }
            }
        )*
    };
}

from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for usize {
    fn from_value(v: Value) -> Result<Self> {
        let n = u64::from_value(v)?;
        usize::try_from(n).map_err(|_| RedisError::type_mismatch("usize", n))
    }
}

impl FromValue for isize {
    fn from_value(v: Value) -> Result<Self> {
        let n = i64::from_value(v)?;
        isize::try_from(n).map_err(|_| RedisError::type_mismatch("isize", n))
    }
}

impl FromValue for bool {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Nil => Ok(false),
            Value::Int(i) => Ok(i != 0),
            Value::Status(ref s) if s == "OK" => Ok(true),
            Value::Data(ref b) if b.as_ref() == b"1" => Ok(true),
            Value::Data(ref b) if b.as_ref() == b"0" => Ok(false),
            other => Err(RedisError::type_mismatch("bool", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Int(i) => Ok(i as f64),
            Value::Data(ref b) => std::str::from_utf8(b)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| RedisError::type_mismatch("f64", &v)),
            Value::Status(ref s) => s
                .parse()
                .map_err(|_| RedisError::type_mismatch("f64", &v)),
            other => Err(RedisError::type_mismatch("f64", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Data(b) => String::from_utf8(b.to_vec())
                .map_err(|e| RedisError::Type(format!("invalid utf-8 in reply: {}", e))),
            Value::Status(s) => Ok(s),
            Value::Int(i) => Ok(i.to_string()),
            other => Err(RedisError::type_mismatch("string", other)),
        }
    }
}

impl FromValue for Bytes {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Data(b) => Ok(b),
            Value::Status(s) => Ok(Bytes::from(s)),
            Value::Int(i) => Ok(Bytes::from(i.to_string())),
            other => Err(RedisError::type_mismatch("bytes", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Nil => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Bulk(items) => items.into_iter().map(T::from_value).collect(),
            Value::Nil => Ok(Vec::new()),
            single => Ok(vec![T::from_value(single)?]),
        }
    }
}

impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn from_value(v: Value) -> Result<Self> {
        v.into_sequence()?.into_iter().map(T::from_value).collect()
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(v: Value) -> Result<Self> {
        Ok(from_pairs(v)?.into_iter().collect())
    }
}

impl<A: FromValue, B: FromValue> FromValue for (A, B) {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Bulk(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(a), Some(b)) => Ok((A::from_value(a)?, B::from_value(b)?)),
                    _ => Err(RedisError::Type("expected a pair".to_string())),
                }
            }
            other => Err(RedisError::type_mismatch("pair", other)),
        }
    }
}

/// Decode a flat `[k1, v1, k2, v2, ...]` array, as returned by HGETALL or
/// any `WITHSCORES` variant.
pub fn from_pairs<A: FromValue, B: FromValue>(v: Value) -> Result<Vec<(A, B)>> {
    let items = v.into_sequence()?;
    if items.len() % 2 != 0 {
        return Err(RedisError::Type(format!(
            "expected an even number of items, got {}",
            items.len()
        )));
    }

    let mut pairs = Vec::with_capacity(items.len() / 2);
    let mut items = items.into_iter();
    while let (Some(a), Some(b)) = (items.next(), items.next()) {
        pairs.push((A::from_value(a)?, B::from_value(b)?));
    }
    Ok(pairs)
}

/// Shorthand for `T::from_value(v)`.
pub fn from_value<T: FromValue>(v: Value) -> Result<T> {
    T::from_value(v)
}
