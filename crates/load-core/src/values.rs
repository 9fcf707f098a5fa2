//! Value representations for the random-data-load framework.
//!
//! `GeneratedValue` is what a generator produces for one column of one row.
//! Values are spliced into INSERT statements as SQL literals rather than bound
//! as parameters, so each value knows how to render (and escape) itself.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single generated (or sampled) column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeneratedValue {
    /// SQL NULL
    Null,

    /// Any integer type, including `year`
    Int(i64),

    /// Fixed-point value rendered with `scale` fractional digits
    Decimal {
        value: f64,
        /// Digits after the decimal point
        scale: u32,
    },

    /// Floating point value rendered with Rust's shortest round-trip format
    Double(f64),

    /// Number kept in the exact text the server returned it as, for
    /// `DECIMAL` and unsigned `BIGINT` values wider than `f64`/`i64`
    Numeric(String),

    /// Character string
    String(String),

    /// Binary string
    Bytes(Vec<u8>),

    /// Calendar date
    Date(NaiveDate),

    /// Date and time of day
    DateTime(NaiveDateTime),

    /// Time of day
    Time(NaiveTime),

    /// JSON document
    Json(serde_json::Value),
}

impl GeneratedValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Decimal { value, .. } | Self::Double(value) => Some(*value),
            Self::Int(i) => Some(*i as f64),
            Self::Numeric(n) => n.parse().ok(),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value as a MySQL literal.
    ///
    /// Numbers are emitted bare, strings and temporal values are single
    /// quoted and escaped, binary strings use hexadecimal notation.
    /// Non-finite floats have no literal form and render as `NULL`.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Int(i) => i.to_string(),
            Self::Decimal { value, scale } if value.is_finite() => {
                format!("{value:.prec$}", prec = *scale as usize)
            }
            Self::Double(value) if value.is_finite() => value.to_string(),
            Self::Decimal { .. } | Self::Double(_) => "NULL".to_string(),
            Self::Numeric(n) if is_numeric_literal(n) => n.clone(),
            Self::Numeric(n) => quote(n),
            Self::String(s) => quote(s),
            Self::Bytes(b) if b.is_empty() => "''".to_string(),
            Self::Bytes(b) => format!("X'{}'", hex::encode_upper(b)),
            Self::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
            Self::DateTime(dt) if dt.nanosecond() != 0 => {
                format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S%.f"))
            }
            Self::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S")),
            Self::Time(t) if t.nanosecond() != 0 => format!("'{}'", t.format("%H:%M:%S%.f")),
            Self::Time(t) => format!("'{}'", t.format("%H:%M:%S")),
            Self::Json(v) => quote(&v.to_string()),
        }
    }
}

impl fmt::Display for GeneratedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql_literal())
    }
}

/// Digits with an optional sign, decimal point and exponent.
fn is_numeric_literal(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

fn quote(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// Escape a string for use inside a single-quoted MySQL literal.
///
/// Matches the escaping done by `mysql_real_escape_string` for the
/// characters that are meaningful in a literal.
pub fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\0' => escaped.push_str("\\0"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\x1a' => escaped.push_str("\\Z"),
            _ => escaped.push(c),
        }
    }
    escaped
}
