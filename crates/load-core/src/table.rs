//! Table and column descriptors.
//!
//! These types are the hand-off point between schema introspection and value
//! generation. They are produced once per run (by the MySQL catalog reader or
//! from a YAML table definition) and never mutated afterwards.

use crate::types::SqlType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Error type for table definition operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Error reading a table definition file
    #[error("Failed to read table definition: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Two columns share a name
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },
}

/// Column referenced by a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Schema (database) of the referenced table
    pub schema: String,
    /// Referenced table
    pub table: String,
    /// Referenced column
    pub column: String,
}

impl ForeignKeyRef {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ForeignKeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.schema, self.table, self.column)
    }
}

/// Normalized view of one column of the target table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, unique within the table
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub sql_type: SqlType,

    /// Whether the column accepts NULL
    #[serde(default)]
    pub nullable: bool,

    /// NOT NULL primary key column filled by `auto_increment`.
    /// Such columns are left out of generation and of the INSERT column list.
    #[serde(default, rename = "auto_increment")]
    pub auto_increment_primary_key: bool,

    /// Maximum length for character and binary strings
    #[serde(default)]
    pub char_max_length: Option<u64>,

    /// Total number of digits for numeric types
    #[serde(default)]
    pub numeric_precision: Option<u32>,

    /// Digits after the decimal point for numeric types
    #[serde(default)]
    pub numeric_scale: Option<u32>,

    /// Allowed values, only for `enum` and `set`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    /// Referenced column, when the column is part of a foreign key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyRef>,
}

impl ColumnDescriptor {
    /// Create a NOT NULL column with no size information.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: false,
            auto_increment_primary_key: false,
            char_max_length: None,
            numeric_precision: None,
            numeric_scale: None,
            enum_values: Vec::new(),
            foreign_key: None,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark the column as an auto-increment primary key.
    pub fn auto_increment_primary_key(mut self) -> Self {
        self.auto_increment_primary_key = true;
        self.nullable = false;
        self
    }

    pub fn with_char_max_length(mut self, length: u64) -> Self {
        self.char_max_length = Some(length);
        self
    }

    pub fn with_numeric(mut self, precision: u32, scale: u32) -> Self {
        self.numeric_precision = Some(precision);
        self.numeric_scale = Some(scale);
        self
    }

    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_foreign_key(mut self, reference: ForeignKeyRef) -> Self {
        self.foreign_key = Some(reference);
        self
    }

    /// Whether the loader provides a value for this column.
    pub fn is_insertable(&self) -> bool {
        !self.auto_increment_primary_key
    }

    /// Number of digits before the decimal point (precision - scale).
    ///
    /// Returns `None` when the precision is unknown.
    pub fn integer_digits(&self) -> Option<u32> {
        self.numeric_precision
            .map(|p| p.saturating_sub(self.numeric_scale.unwrap_or(0)))
    }
}

/// Index on the target table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    #[serde(default)]
    pub unique: bool,
    /// Indexed columns in index order
    pub columns: Vec<String>,
}

/// Trigger defined on the target table.
///
/// Triggers are informational only: they may change row counts or cause side
/// effects the loader does not account for, so their presence is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub name: String,
    /// `BEFORE` or `AFTER`
    pub timing: String,
    /// `INSERT`, `UPDATE` or `DELETE`
    pub event: String,
    /// Trigger body
    #[serde(default)]
    pub statement: String,
}

/// The target table: where rows go and what they look like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Schema (database) name
    pub schema: String,
    /// Table name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<Index>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Trigger>,
}

impl Table {
    /// Create a table with no indexes or triggers.
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<ColumnDescriptor>,
    ) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns,
            indexes: Vec::new(),
            triggers: Vec::new(),
        }
    }

    pub fn with_indexes(mut self, indexes: Vec<Index>) -> Self {
        self.indexes = indexes;
        self
    }

    pub fn with_triggers(mut self, triggers: Vec<Trigger>) -> Self {
        self.triggers = triggers;
        self
    }

    /// Load a table definition from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a table definition from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, TableError> {
        let table: Table = serde_yaml::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), TableError> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns the loader provides values for, in declaration order.
    pub fn insertable_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.is_insertable())
    }

    /// Columns that reference another table.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&ColumnDescriptor, &ForeignKeyRef)> {
        self.columns
            .iter()
            .filter_map(|c| c.foreign_key.as_ref().map(|fk| (c, fk)))
    }

    /// Unique indexes, including the primary key.
    pub fn unique_indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.iter().filter(|i| i.unique)
    }

    pub fn has_triggers(&self) -> bool {
        !self.triggers.is_empty()
    }
}
