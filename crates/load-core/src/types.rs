//! Column type vocabulary for the random-data-load framework.
//!
//! `SqlType` is the closed set of MySQL column types the loader knows how to
//! generate values for. It is resolved once, when the table is introspected,
//! so generator dispatch downstream is an exhaustive `match` rather than a
//! lookup on type-name strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// MySQL column type tag.
///
/// The text-family and blob-family variants cover all of their size classes
/// (`tinytext` .. `longtext`, `tinyblob` .. `longblob`); the size bound is
/// carried separately in [`crate::ColumnDescriptor::char_max_length`].
///
/// # YAML Format
///
/// ```yaml
/// type: varchar
/// type: datetime
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    // Integer types
    /// 8-bit integer
    TinyInt,
    /// 16-bit integer
    SmallInt,
    /// 24-bit integer
    MediumInt,
    /// 32-bit integer (`int` / `integer`)
    Int,
    /// 64-bit integer
    BigInt,

    // Approximate and exact numerics
    /// Single precision floating point
    Float,
    /// Exact decimal (`decimal` / `numeric`)
    Decimal,
    /// Double precision floating point (`double` / `real`)
    Double,

    // Character strings
    /// Fixed-length character string
    Char,
    /// Variable-length character string
    VarChar,
    /// Any of the `text` family
    Text,

    // Binary strings
    /// Fixed-length binary string
    Binary,
    /// Variable-length binary string
    VarBinary,
    /// Any of the `blob` family
    Blob,

    // Temporal types
    /// Calendar date
    Date,
    /// Date and time of day
    DateTime,
    /// Date and time of day stored as UTC
    Timestamp,
    /// Time of day
    Time,
    /// Four-digit year
    Year,

    // Value-list types
    /// One of a declared list of values
    Enum,
    /// Subset of a declared list of values
    Set,

    /// JSON document
    Json,

    /// Any type the loader cannot generate values for (geometry, bit, ...).
    /// Carries the original `DATA_TYPE` name for diagnostics.
    Unsupported(String),
}

impl SqlType {
    /// Whether values of this type are integers.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::TinyInt | Self::SmallInt | Self::MediumInt | Self::Int | Self::BigInt | Self::Year
        )
    }

    /// Whether values of this type are binary strings.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary | Self::VarBinary | Self::Blob)
    }

    /// Whether the loader can produce values for this type.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// MySQL name of the type, as it appears in `DATA_TYPE`.
    pub fn name(&self) -> &str {
        match self {
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::MediumInt => "mediumint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Char => "char",
            Self::VarChar => "varchar",
            Self::Text => "text",
            Self::Binary => "binary",
            Self::VarBinary => "varbinary",
            Self::Blob => "blob",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Time => "time",
            Self::Year => "year",
            Self::Enum => "enum",
            Self::Set => "set",
            Self::Json => "json",
            Self::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_names() {
        let t: SqlType = serde_yaml::from_str("varchar").unwrap();
        assert_eq!(t, SqlType::VarChar);

        let t: SqlType = serde_yaml::from_str("datetime").unwrap();
        assert_eq!(t, SqlType::DateTime);
    }

    #[test]
    fn test_classification() {
        assert!(SqlType::Year.is_integer());
        assert!(!SqlType::Decimal.is_integer());
        assert!(SqlType::VarBinary.is_binary());
        assert!(!SqlType::Unsupported("bit".to_string()).is_supported());
    }

    #[test]
    fn test_display_uses_mysql_name() {
        assert_eq!(SqlType::MediumInt.to_string(), "mediumint");
        assert_eq!(SqlType::Unsupported("point".to_string()).to_string(), "point");
    }
}
