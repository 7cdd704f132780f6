use crate::utils::EPOCH_DAYS_FROM_CE;
use chrono::NaiveDate;
use indexmap::IndexMap;
use polars::prelude::AnyValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// A single CSV cell with an explicit null.
///
/// Floats compare and hash by bit pattern so a value can key a map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    /// Canonical form for keying a map: integral floats become `Int`, so
    /// `1` and `1.0` land on the same key.
    pub fn into_key(self) -> Self {
        match self {
            CellValue::Float(x)
                if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 =>
            {
                CellValue::Int(x as i64)
            }
            other => other,
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(b) => b.hash(state),
            CellValue::Int(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "null"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<AnyValue<'_>> for CellValue {
    fn from(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => CellValue::Null,
            AnyValue::Boolean(b) => CellValue::Bool(b),
            AnyValue::Int8(i) => CellValue::Int(i64::from(i)),
            AnyValue::Int16(i) => CellValue::Int(i64::from(i)),
            AnyValue::Int32(i) => CellValue::Int(i64::from(i)),
            AnyValue::Int64(i) => CellValue::Int(i),
            AnyValue::UInt8(i) => CellValue::Int(i64::from(i)),
            AnyValue::UInt16(i) => CellValue::Int(i64::from(i)),
            AnyValue::UInt32(i) => CellValue::Int(i64::from(i)),
            AnyValue::UInt64(i) => match i64::try_from(i) {
                Ok(v) => CellValue::Int(v),
                Err(_) => CellValue::Float(i as f64),
            },
            AnyValue::Float32(x) => CellValue::Float(f64::from(x)),
            AnyValue::Float64(x) => CellValue::Float(x),
            AnyValue::Date(days) => {
                match NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE) {
                    Some(date) => CellValue::Date(date),
                    None => CellValue::Null,
                }
            }
            AnyValue::String(s) => CellValue::Text(s.to_string()),
            AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// A result paired with the wall-clock time it took to produce.
///
/// Degraded results carry [`Duration::ZERO`].
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    pub fn new(value: T, elapsed: Duration) -> Self {
        Self { value, elapsed }
    }

    /// Elapsed seconds rounded to millisecond precision.
    pub fn elapsed_secs(&self) -> f64 {
        (self.elapsed.as_secs_f64() * 1000.0).round() / 1000.0
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Default> Timed<T> {
    /// Empty value with zero elapsed time.
    pub fn degraded() -> Self {
        Self {
            value: T::default(),
            elapsed: Duration::ZERO,
        }
    }
}

/// `id` -> (column -> value), first-insertion ordered.
pub type RowKeyedMap = IndexMap<CellValue, IndexMap<String, CellValue>>;

/// column -> every value of that column across fragments, in fragment order.
pub type ColumnKeyedMap = IndexMap<String, Vec<CellValue>>;

/// Sentinel for absent homepage/poster fields.
pub const NOT_AVAILABLE: &str = "NOT AVAILABLE";

/// Homepage and poster path of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterLinks {
    pub homepage: String,
    pub poster_path: String,
}

impl fmt::Display for PosterLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{homepage: {}, poster_path: {}}}",
            self.homepage, self.poster_path
        )
    }
}
