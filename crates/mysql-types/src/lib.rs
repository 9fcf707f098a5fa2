//! MySQL type conversions for load-core types.
//!
//! # Structure
//!
//! - `schema`: `information_schema` column metadata → `ColumnDescriptor`
//! - `reverse`: MySQL values → `GeneratedValue` (for sampling existing rows)
//! - `statement`: identifier quoting and `INSERT` statement text
//!
//! # Example
//!
//! ```rust
//! use load_core::SqlType;
//! use mysql_types::{mysql_column_to_sql_type, InsertMode, InsertTemplate};
//!
//! assert_eq!(mysql_column_to_sql_type("varchar"), SqlType::VarChar);
//!
//! let insert = InsertTemplate::new("shop", "orders", &["status"], InsertMode::Ignore);
//! assert_eq!(
//!     insert.render(["'paid'"]),
//!     "INSERT IGNORE INTO `shop`.`orders` (`status`) VALUES ('paid')"
//! );
//! ```

pub mod reverse;
pub mod schema;
pub mod statement;

pub use reverse::{decode_value, ConversionError};
pub use schema::{extract_set_or_enum_values, mysql_column_to_sql_type, InformationSchemaColumn};
pub use statement::{qualified_table_name, quote_identifier, InsertMode, InsertTemplate};
