//! Reverse conversion: MySQL values → GeneratedValue
//!
//! Used when sampling existing values of a referenced column: the driver
//! hands back `mysql_async::Value`s and this module decodes them according to
//! the column's declared [`SqlType`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use load_core::{GeneratedValue, SqlType};
use mysql_async::Value;
use thiserror::Error;

/// Error during MySQL value conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Unsupported MySQL type: {0}")]
    UnsupportedType(SqlType),
    #[error("Type mismatch: expected {expected}, got {actual:?}")]
    TypeMismatch { expected: String, actual: Value },
    #[error("Invalid UTF-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("Invalid date/time value")]
    InvalidDateTime,
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Decode a value read from a column of the given type.
///
/// `scale` is the column's `NUMERIC_SCALE`, used to keep decimals at their
/// declared number of fractional digits when they are rendered back.
pub fn decode_value(
    value: Value,
    sql_type: &SqlType,
    scale: Option<u32>,
) -> Result<GeneratedValue, ConversionError> {
    if matches!(value, Value::NULL) {
        return Ok(GeneratedValue::Null);
    }

    match sql_type {
        SqlType::TinyInt
        | SqlType::SmallInt
        | SqlType::MediumInt
        | SqlType::Int
        | SqlType::BigInt
        | SqlType::Year => decode_integer(&value),

        SqlType::Float | SqlType::Double => Ok(GeneratedValue::Double(extract_float(&value)?)),

        // The text protocol returns decimals as text; keep it verbatim so the
        // value matches the referenced key exactly.
        SqlType::Decimal => match &value {
            Value::Bytes(b) => Ok(GeneratedValue::Numeric(
                String::from_utf8(b.clone())?.trim().to_string(),
            )),
            _ => Ok(GeneratedValue::Decimal {
                value: extract_float(&value)?,
                scale: scale.unwrap_or(0),
            }),
        },

        SqlType::Char | SqlType::VarChar | SqlType::Text | SqlType::Enum | SqlType::Set => {
            Ok(GeneratedValue::String(extract_string(&value)?))
        }

        SqlType::Binary | SqlType::VarBinary | SqlType::Blob => {
            Ok(GeneratedValue::Bytes(extract_bytes(&value)?))
        }

        SqlType::Date => Ok(GeneratedValue::Date(extract_date(&value)?)),

        SqlType::DateTime | SqlType::Timestamp => {
            Ok(GeneratedValue::DateTime(extract_datetime(&value)?))
        }

        SqlType::Time => Ok(GeneratedValue::Time(extract_time(&value)?)),

        SqlType::Json => {
            let text = extract_string(&value)?;
            Ok(GeneratedValue::Json(serde_json::from_str(&text)?))
        }

        SqlType::Unsupported(_) => Err(ConversionError::UnsupportedType(sql_type.clone())),
    }
}

/// Decode an integer column; unsigned values beyond `i64` keep their text.
fn decode_integer(value: &Value) -> Result<GeneratedValue, ConversionError> {
    match extract_int(value) {
        Ok(i) => Ok(GeneratedValue::Int(i)),
        Err(e) => match value {
            Value::UInt(u) => Ok(GeneratedValue::Numeric(u.to_string())),
            Value::Bytes(b) => {
                let text = String::from_utf8(b.clone())?;
                match text.trim().parse::<u64>() {
                    Ok(u) => Ok(GeneratedValue::Numeric(u.to_string())),
                    Err(_) => Err(e),
                }
            }
            _ => Err(e),
        },
    }
}

/// Extract integer from MySQL Value.
fn extract_int(value: &Value) -> Result<i64, ConversionError> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::UInt(u) => i64::try_from(*u).map_err(|_| ConversionError::TypeMismatch {
            expected: "signed 64-bit integer".to_string(),
            actual: value.clone(),
        }),
        Value::Bytes(b) => {
            let s = String::from_utf8(b.clone())?;
            s.trim().parse().map_err(|_| ConversionError::TypeMismatch {
                expected: "integer".to_string(),
                actual: value.clone(),
            })
        }
        _ => Err(ConversionError::TypeMismatch {
            expected: "integer".to_string(),
            actual: value.clone(),
        }),
    }
}

/// Extract float from MySQL Value.
fn extract_float(value: &Value) -> Result<f64, ConversionError> {
    match value {
        Value::Float(f) => Ok(*f as f64),
        Value::Double(d) => Ok(*d),
        Value::Int(i) => Ok(*i as f64),
        Value::UInt(u) => Ok(*u as f64),
        Value::Bytes(b) => {
            let s = String::from_utf8(b.clone())?;
            s.trim().parse().map_err(|_| ConversionError::TypeMismatch {
                expected: "float".to_string(),
                actual: value.clone(),
            })
        }
        _ => Err(ConversionError::TypeMismatch {
            expected: "float".to_string(),
            actual: value.clone(),
        }),
    }
}

/// Extract string from MySQL Value.
fn extract_string(value: &Value) -> Result<String, ConversionError> {
    match value {
        Value::Bytes(b) => Ok(String::from_utf8(b.clone())?),
        Value::Int(i) => Ok(i.to_string()),
        Value::UInt(u) => Ok(u.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Double(d) => Ok(d.to_string()),
        _ => Err(ConversionError::TypeMismatch {
            expected: "string".to_string(),
            actual: value.clone(),
        }),
    }
}

/// Extract bytes from MySQL Value.
fn extract_bytes(value: &Value) -> Result<Vec<u8>, ConversionError> {
    match value {
        Value::Bytes(b) => Ok(b.clone()),
        _ => Err(ConversionError::TypeMismatch {
            expected: "bytes".to_string(),
            actual: value.clone(),
        }),
    }
}

/// Extract date from MySQL Value.
fn extract_date(value: &Value) -> Result<NaiveDate, ConversionError> {
    match value {
        Value::Date(year, month, day, _, _, _, _) => {
            NaiveDate::from_ymd_opt(*year as i32, *month as u32, *day as u32)
                .ok_or(ConversionError::InvalidDateTime)
        }
        Value::Bytes(b) => {
            let s = String::from_utf8(b.clone())?;
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| ConversionError::InvalidDateTime)
        }
        _ => Err(ConversionError::TypeMismatch {
            expected: "date".to_string(),
            actual: value.clone(),
        }),
    }
}

/// Extract time of day from MySQL Value.
///
/// MySQL `TIME` is really an interval; values outside a single day (or
/// negative ones) have no time-of-day equivalent and are rejected.
fn extract_time(value: &Value) -> Result<NaiveTime, ConversionError> {
    match value {
        Value::Time(false, 0, hour, min, sec, micro) => {
            NaiveTime::from_hms_micro_opt(*hour as u32, *min as u32, *sec as u32, *micro)
                .ok_or(ConversionError::InvalidDateTime)
        }
        Value::Time(..) => Err(ConversionError::InvalidDateTime),
        Value::Bytes(b) => {
            let s = String::from_utf8(b.clone())?;
            NaiveTime::parse_from_str(&s, "%H:%M:%S%.f")
                .map_err(|_| ConversionError::InvalidDateTime)
        }
        _ => Err(ConversionError::TypeMismatch {
            expected: "time".to_string(),
            actual: value.clone(),
        }),
    }
}

/// Extract datetime from MySQL Value.
fn extract_datetime(value: &Value) -> Result<NaiveDateTime, ConversionError> {
    match value {
        Value::Date(year, month, day, hour, min, sec, micro) => Ok(NaiveDateTime::new(
            NaiveDate::from_ymd_opt(*year as i32, *month as u32, *day as u32)
                .ok_or(ConversionError::InvalidDateTime)?,
            NaiveTime::from_hms_micro_opt(*hour as u32, *min as u32, *sec as u32, *micro)
                .ok_or(ConversionError::InvalidDateTime)?,
        )),
        Value::Bytes(b) => {
            let s = String::from_utf8(b.clone())?;
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                .map_err(|_| ConversionError::InvalidDateTime)
        }
        _ => Err(ConversionError::TypeMismatch {
            expected: "datetime".to_string(),
            actual: value.clone(),
        }),
    }
}
