//! Core types for the random-data-load framework.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace:
//!
//! - [`SqlType`] - Closed set of MySQL column types the loader understands
//! - [`ColumnDescriptor`] - Normalized view of one column of the target table
//! - [`Table`] - Columns, indexes, foreign keys and triggers of the target table
//! - [`GeneratedValue`] - One produced value and its SQL literal rendering
//!
//! # Architecture
//!
//! ```text
//! load-core (this crate)
//!    │
//!    ├─── mysql-types          (information_schema strings → SqlType, row decoding)
//!    ├─── load-generator       (ColumnDescriptor → Generator → RowTemplate)
//!    └─── load-populate-mysql  (catalog, sampler, planner, orchestrator, retry)
//! ```
//!
//! # Example
//!
//! ```rust
//! use load_core::{ColumnDescriptor, GeneratedValue, SqlType};
//!
//! let column = ColumnDescriptor::new("email", SqlType::VarChar)
//!     .with_char_max_length(64)
//!     .nullable(true);
//! assert!(column.is_insertable());
//!
//! let value = GeneratedValue::String("O'Brien".to_string());
//! assert_eq!(value.to_sql_literal(), "'O\\'Brien'");
//! ```

pub mod table;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use table::{ColumnDescriptor, ForeignKeyRef, Index, Table, TableError, Trigger};
pub use types::SqlType;
pub use values::{escape_string, GeneratedValue};
