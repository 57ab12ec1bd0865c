//! Cell values held in columnar tables.

use chrono::{DateTime, NaiveDateTime};
use std::fmt;

/// Timestamp as carried on the wire: `(xi)` seconds since the epoch plus
/// microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct WireDateTime {
    pub seconds: i64,
    pub micros: i32,
}

impl WireDateTime {
    /// Create from seconds and microseconds.
    pub fn new(seconds: i64, micros: i32) -> Self {
        Self { seconds, micros }
    }

    /// Convert a calendar timestamp (interpreted as UTC).
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        let utc = dt.and_utc();
        Self {
            seconds: utc.timestamp(),
            micros: utc.timestamp_subsec_micros() as i32,
        }
    }

    /// Convert to a calendar timestamp; `None` when out of range.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        if !(0..1_000_000).contains(&self.micros) {
            return None;
        }
        DateTime::from_timestamp(self.seconds, self.micros as u32 * 1000).map(|dt| dt.naive_utc())
    }
}

/// A single cell of a recordset.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// NULL value.
    Null,
    Bool(bool),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    /// Text (character columns, decimals, unknown types).
    Text(String),
    /// Raw binary value.
    Binary(Vec<u8>),
    DateTime(WireDateTime),
}

impl Cell {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Cell::Byte(v) => Some(*v as i64),
            Cell::Int16(v) => Some(*v as i64),
            Cell::UInt16(v) => Some(*v as i64),
            Cell::Int32(v) => Some(*v as i64),
            Cell::UInt32(v) => Some(*v as i64),
            Cell::Int64(v) => Some(*v),
            Cell::UInt64(v) => i64::try_from(*v).ok(),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Cell::Double(v) => Some(*v),
            Cell::Text(s) => s.trim().parse().ok(),
            other => other.to_i64().map(|v| v as f64),
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Cell::Binary(bytes) => Some(bytes),
            Cell::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Try to get the value as a calendar timestamp.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::DateTime(dt) => dt.to_naive(),
            _ => None,
        }
    }

    /// Approximate payload size, used when splitting recordsets into chunks.
    pub fn approx_size(&self) -> usize {
        match self {
            Cell::Null => 0,
            Cell::Bool(_) | Cell::Int32(_) | Cell::UInt32(_) => 4,
            Cell::Byte(_) => 1,
            Cell::Int16(_) | Cell::UInt16(_) => 2,
            Cell::Int64(_) | Cell::UInt64(_) | Cell::Double(_) => 8,
            // UTF-16 in the server's accounting
            Cell::Text(s) => s.chars().count() * 2,
            Cell::Binary(b) => b.len(),
            Cell::DateTime(_) => 12,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Cell::Int32(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int64(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Double(v)
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(dt: NaiveDateTime) -> Self {
        Cell::DateTime(WireDateTime::from_naive(dt))
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Bool(v) => write!(f, "{}", if *v { 1 } else { 0 }),
            Cell::Byte(v) => write!(f, "{}", v),
            Cell::Int16(v) => write!(f, "{}", v),
            Cell::UInt16(v) => write!(f, "{}", v),
            Cell::Int32(v) => write!(f, "{}", v),
            Cell::UInt32(v) => write!(f, "{}", v),
            Cell::Int64(v) => write!(f, "{}", v),
            Cell::UInt64(v) => write!(f, "{}", v),
            Cell::Double(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Binary(bytes) => write!(f, "<BINARY: {} bytes>", bytes.len()),
            Cell::DateTime(dt) => match dt.to_naive() {
                Some(n) => write!(f, "{}", n.format("%Y-%m-%d %H:%M:%S%.f")),
                None => write!(f, "[{},{}]", dt.seconds, dt.micros),
            },
        }
    }
}
