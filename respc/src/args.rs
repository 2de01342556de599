//! Conversion of Rust values into command arguments, plus the option types
//! used by the typed command methods.

use bytes::Bytes;

/// A value that can be sent as a single binary-safe command argument.
pub trait ToArg {
    fn to_arg(&self) -> Vec<u8>;
}

impl ToArg for str {
    fn to_arg(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl ToArg for [u8] {
    fn to_arg(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl ToArg for Vec<u8> {
    fn to_arg(&self) -> Vec<u8> {
        self.clone()
    }
}

impl ToArg for Bytes {
    fn to_arg(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<T: ToArg + ?Sized> ToArg for &T {
    fn to_arg(&self) -> Vec<u8> {
        (**self).to_arg()
    }
}

macro_rules! to_arg_display {
    ($($t:ty),*) => {
        $(
            impl ToArg for $t {
                fn to_arg(&self) -> Vec<u8> {
                    self.to_string().into_bytes()
                }
            }
        )*
    };
}

to_arg_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToArg for f64 {
    fn to_arg(&self) -> Vec<u8> {
        format_float(*self).into_bytes()
    }
}

impl ToArg for f32 {
    fn to_arg(&self) -> Vec<u8> {
        format_float(f64::from(*self)).into_bytes()
    }
}

impl ToArg for bool {
    fn to_arg(&self) -> Vec<u8> {
        if *self { b"1".to_vec() } else { b"0".to_vec() }
    }
}

fn format_float(f: f64) -> String {
    if f == f64::INFINITY {
        "+inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        f.to_string()
    }
}

/// One end of a score range for ZRANGEBYSCORE, ZCOUNT and friends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBound {
    Inclusive(f64),
    Exclusive(f64),
    NegInf,
    PosInf,
}

impl ToArg for ScoreBound {
    fn to_arg(&self) -> Vec<u8> {
        match self {
            ScoreBound::Inclusive(f) => format_float(*f).into_bytes(),
            ScoreBound::Exclusive(f) => format!("({}", format_float(*f)).into_bytes(),
            ScoreBound::NegInf => b"-inf".to_vec(),
            ScoreBound::PosInf => b"+inf".to_vec(),
        }
    }
}

impl From<f64> for ScoreBound {
    fn from(f: f64) -> Self {
        ScoreBound::Inclusive(f)
    }
}

impl From<i64> for ScoreBound {
    fn from(i: i64) -> Self {
        ScoreBound::Inclusive(i as f64)
    }
}

impl From<i32> for ScoreBound {
    fn from(i: i32) -> Self {
        ScoreBound::Inclusive(f64::from(i))
    }
}

/// AGGREGATE mode for ZUNIONSTORE / ZINTERSTORE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Min,
    Max,
}

impl ToArg for Aggregate {
    fn to_arg(&self) -> Vec<u8> {
        match self {
            Aggregate::Sum => b"SUM".to_vec(),
            Aggregate::Min => b"MIN".to_vec(),
            Aggregate::Max => b"MAX".to_vec(),
        }
    }
}

/// Optional WEIGHTS and AGGREGATE clauses of ZUNIONSTORE / ZINTERSTORE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZStoreOptions {
    pub weights: Vec<f64>,
    pub aggregate: Option<Aggregate>,
}

impl ZStoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(mut self, weights: impl IntoIterator<Item = f64>) -> Self {
        self.weights = weights.into_iter().collect();
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    pub(crate) fn to_args(&self) -> Vec<Vec<u8>> {
        let mut args = Vec::new();
        if !self.weights.is_empty() {
            args.push(b"WEIGHTS".to_vec());
            args.extend(self.weights.iter().map(ToArg::to_arg));
        }
        if let Some(aggregate) = self.aggregate {
            args.push(b"AGGREGATE".to_vec());
            args.push(aggregate.to_arg());
        }
        args
    }
}

/// Clauses of the SORT command. STORE is handled by `Client::sort_store`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortOptions {
    by: Option<String>,
    limit: Option<(i64, i64)>,
    get: Vec<String>,
    desc: bool,
    alpha: bool,
}

impl SortOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(mut self, pattern: impl Into<String>) -> Self {
        self.by = Some(pattern.into());
        self
    }

    pub fn limit(mut self, offset: i64, count: i64) -> Self {
        self.limit = Some((offset, count));
        self
    }

    /// May be given several times; `#` returns the element itself.
    pub fn get(mut self, pattern: impl Into<String>) -> Self {
        self.get.push(pattern.into());
        self
    }

    pub fn desc(mut self) -> Self {
        self.desc = true;
        self
    }

    pub fn alpha(mut self) -> Self {
        self.alpha = true;
        self
    }

    pub(crate) fn to_args(&self) -> Vec<Vec<u8>> {
        let mut args = Vec::new();
        if let Some(by) = &self.by {
            args.push(b"BY".to_vec());
            args.push(by.to_arg());
        }
        if let Some((offset, count)) = self.limit {
            args.push(b"LIMIT".to_vec());
            args.push(offset.to_arg());
            args.push(count.to_arg());
        }
        for pattern in &self.get {
            args.push(b"GET".to_vec());
            args.push(pattern.to_arg());
        }
        if self.desc {
            args.push(b"DESC".to_vec());
        }
        if self.alpha {
            args.push(b"ALPHA".to_vec());
        }
        args
    }
}
