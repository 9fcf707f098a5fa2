//! MySQL schema column type conversion.
//!
//! This module converts the raw `information_schema.COLUMNS` fields of a column
//! into a [`ColumnDescriptor`]. It performs no I/O; the catalog reader in
//! `load-populate-mysql` runs the queries and hands the rows over here.

use load_core::{ColumnDescriptor, SqlType};

/// Raw column metadata as read from `information_schema.COLUMNS`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InformationSchemaColumn {
    /// `COLUMN_NAME`
    pub name: String,
    /// `IS_NULLABLE` ("YES" / "NO")
    pub is_nullable: String,
    /// `DATA_TYPE`, e.g. "varchar"
    pub data_type: String,
    /// `COLUMN_TYPE`, e.g. "varchar(255)" or "enum('a','b')"
    pub column_type: String,
    /// `CHARACTER_MAXIMUM_LENGTH`
    pub char_max_length: Option<u64>,
    /// `NUMERIC_PRECISION`
    pub numeric_precision: Option<u32>,
    /// `NUMERIC_SCALE`
    pub numeric_scale: Option<u32>,
    /// `COLUMN_KEY` ("PRI", "UNI", "MUL" or "")
    pub column_key: String,
    /// `EXTRA`, e.g. "auto_increment" or "VIRTUAL GENERATED"
    pub extra: String,
}

impl InformationSchemaColumn {
    /// Convert to a [`ColumnDescriptor`] (without foreign key information).
    pub fn to_descriptor(&self) -> ColumnDescriptor {
        let nullable = self.is_nullable.eq_ignore_ascii_case("YES");
        let sql_type = if is_generated_column(&self.extra) {
            // The server computes generated columns; they can't be inserted into.
            SqlType::Unsupported(format!("generated {}", self.data_type.to_lowercase()))
        } else {
            mysql_column_to_sql_type(&self.data_type)
        };

        let mut column = ColumnDescriptor::new(self.name.clone(), sql_type).nullable(nullable);
        column.char_max_length = self.char_max_length;
        column.numeric_precision = self.numeric_precision;
        column.numeric_scale = self.numeric_scale;

        if !nullable
            && self.column_key.eq_ignore_ascii_case("PRI")
            && self.extra.to_lowercase().contains("auto_increment")
        {
            column = column.auto_increment_primary_key();
        }

        if matches!(column.sql_type, SqlType::Enum | SqlType::Set) {
            column.enum_values = extract_set_or_enum_values(&self.column_type);
        }

        column
    }
}

/// Convert a MySQL `DATA_TYPE` name to a [`SqlType`].
///
/// # Example
///
/// ```
/// use load_core::SqlType;
/// use mysql_types::mysql_column_to_sql_type;
///
/// assert_eq!(mysql_column_to_sql_type("INT"), SqlType::Int);
/// assert_eq!(mysql_column_to_sql_type("mediumtext"), SqlType::Text);
/// assert_eq!(
///     mysql_column_to_sql_type("point"),
///     SqlType::Unsupported("point".to_string())
/// );
/// ```
pub fn mysql_column_to_sql_type(data_type: &str) -> SqlType {
    match data_type.to_lowercase().as_str() {
        // Numeric types
        "tinyint" => SqlType::TinyInt,
        "smallint" => SqlType::SmallInt,
        "mediumint" => SqlType::MediumInt,
        "int" | "integer" => SqlType::Int,
        "bigint" => SqlType::BigInt,
        "float" => SqlType::Float,
        "decimal" | "numeric" => SqlType::Decimal,
        "double" | "real" => SqlType::Double,

        // String types
        "char" => SqlType::Char,
        "varchar" => SqlType::VarChar,
        "tinytext" | "text" | "mediumtext" | "longtext" => SqlType::Text,

        // Binary types
        "binary" => SqlType::Binary,
        "varbinary" => SqlType::VarBinary,
        "tinyblob" | "blob" | "mediumblob" | "longblob" => SqlType::Blob,

        // Date/Time types
        "date" => SqlType::Date,
        "datetime" => SqlType::DateTime,
        "timestamp" => SqlType::Timestamp,
        "time" => SqlType::Time,
        "year" => SqlType::Year,

        "enum" => SqlType::Enum,
        "set" => SqlType::Set,
        "json" => SqlType::Json,

        other => SqlType::Unsupported(other.to_string()),
    }
}

fn is_generated_column(extra: &str) -> bool {
    extra.to_uppercase().contains("GENERATED")
        && !extra.to_uppercase().contains("DEFAULT_GENERATED")
}

/// Extract values from a MySQL SET or ENUM column type string.
///
/// Quotes inside values are doubled by MySQL (`'it''s'`) and values may
/// contain commas, so this walks the string instead of splitting on `,`.
///
/// E.g., "set('a','b','c')" -> vec!["a", "b", "c"]
/// E.g., "enum('small','x,l','it''s')" -> vec!["small", "x,l", "it's"]
pub fn extract_set_or_enum_values(column_type: &str) -> Vec<String> {
    let (Some(start), Some(end)) = (column_type.find('('), column_type.rfind(')')) else {
        return Vec::new();
    };
    if start >= end {
        return Vec::new();
    }

    let mut values = Vec::new();
    let mut chars = column_type[start + 1..end].chars().peekable();
    let mut current = String::new();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('\'', false) => in_quotes = true,
            ('\'', true) if chars.peek() == Some(&'\'') => {
                current.push('\'');
                chars.next();
            }
            ('\'', true) => {
                in_quotes = false;
                values.push(std::mem::take(&mut current));
            }
            ('\\', true) => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (c, true) => current.push(c),
            // Separators and whitespace between quoted values
            (_, false) => {}
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(data_type: &str, column_type: &str) -> InformationSchemaColumn {
        InformationSchemaColumn {
            name: "c".to_string(),
            is_nullable: "NO".to_string(),
            data_type: data_type.to_string(),
            column_type: column_type.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mysql_int_types() {
        assert_eq!(mysql_column_to_sql_type("TINYINT"), SqlType::TinyInt);
        assert_eq!(mysql_column_to_sql_type("smallint"), SqlType::SmallInt);
        assert_eq!(mysql_column_to_sql_type("MEDIUMINT"), SqlType::MediumInt);
        assert_eq!(mysql_column_to_sql_type("integer"), SqlType::Int);
        assert_eq!(mysql_column_to_sql_type("BIGINT"), SqlType::BigInt);
        assert_eq!(mysql_column_to_sql_type("year"), SqlType::Year);
    }

    #[test]
    fn test_mysql_string_and_binary_types() {
        assert_eq!(mysql_column_to_sql_type("VARCHAR"), SqlType::VarChar);
        assert_eq!(mysql_column_to_sql_type("longtext"), SqlType::Text);
        assert_eq!(mysql_column_to_sql_type("TINYBLOB"), SqlType::Blob);
        assert_eq!(mysql_column_to_sql_type("varbinary"), SqlType::VarBinary);
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        assert_eq!(
            mysql_column_to_sql_type("GEOMETRY"),
            SqlType::Unsupported("geometry".to_string())
        );
        assert_eq!(
            mysql_column_to_sql_type("bit"),
            SqlType::Unsupported("bit".to_string())
        );
    }

    #[test]
    fn test_extract_set_or_enum_values() {
        assert_eq!(
            extract_set_or_enum_values("set('a','b','c')"),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            extract_set_or_enum_values("enum('small','x,l','it''s')"),
            vec!["small", "x,l", "it's"]
        );
        assert_eq!(extract_set_or_enum_values("enum('')"), vec![""]);
        assert!(extract_set_or_enum_values("int(11)").is_empty());
        assert!(extract_set_or_enum_values("text").is_empty());
    }

    #[test]
    fn test_to_descriptor_auto_increment_primary_key() {
        let mut raw = column("int", "int unsigned");
        raw.column_key = "PRI".to_string();
        raw.extra = "auto_increment".to_string();

        let descriptor = raw.to_descriptor();
        assert!(descriptor.auto_increment_primary_key);
        assert!(!descriptor.is_insertable());
    }

    #[test]
    fn test_to_descriptor_nullable_primary_key_is_insertable() {
        let mut raw = column("int", "int");
        raw.is_nullable = "YES".to_string();
        raw.column_key = "PRI".to_string();
        raw.extra = "auto_increment".to_string();

        assert!(raw.to_descriptor().is_insertable());
    }

    #[test]
    fn test_to_descriptor_enum_values_and_sizes() {
        let raw = column("enum", "enum('new','paid')");
        let descriptor = raw.to_descriptor();
        assert_eq!(descriptor.sql_type, SqlType::Enum);
        assert_eq!(descriptor.enum_values, vec!["new", "paid"]);

        let mut raw = column("decimal", "decimal(10,2)");
        raw.numeric_precision = Some(10);
        raw.numeric_scale = Some(2);
        raw.is_nullable = "YES".to_string();
        let descriptor = raw.to_descriptor();
        assert!(descriptor.nullable);
        assert_eq!(descriptor.integer_digits(), Some(8));
    }

    #[test]
    fn test_to_descriptor_generated_column_is_unsupported() {
        let mut raw = column("int", "int");
        raw.extra = "VIRTUAL GENERATED".to_string();
        assert!(!raw.to_descriptor().sql_type.is_supported());

        // DEFAULT CURRENT_TIMESTAMP columns report DEFAULT_GENERATED but are writable
        let mut raw = column("timestamp", "timestamp");
        raw.extra = "DEFAULT_GENERATED".to_string();
        assert_eq!(raw.to_descriptor().sql_type, SqlType::Timestamp);
    }
}
