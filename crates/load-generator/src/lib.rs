//! Value generators for the random-data-load framework.
//!
//! This crate turns the columns of a [`load_core::Table`] into a
//! [`RowTemplate`]: one [`Generator`] per insertable column, built once per
//! run and shared read-only by every task that produces rows.
//!
//! # Architecture
//!
//! ```text
//! Table (ColumnDescriptor, ...)
//!        │
//!        ▼
//! ┌──────────────────────┐      ┌──────────────┐
//! │  build_row_template  │─────▶│ SampleSource │  (foreign key columns)
//! └──────────┬───────────┘      └──────────────┘
//!            │
//!            ▼
//!  RowTemplate + BuildReport
//!            │
//!            ▼
//!   RowGenerator { template, rng (StdRng), index }
//!            │
//!            ▼
//!   Vec<GeneratedValue> / rendered "(v1, v2, ...)"
//! ```
//!
//! # Example
//!
//! ```rust
//! use load_core::{ColumnDescriptor, SqlType, Table};
//! use load_generator::{build_row_template, OfflineSampleSource, RegistryOptions, RowGenerator};
//! use std::sync::Arc;
//!
//! let table = Table::new(
//!     "shop",
//!     "customers",
//!     vec![
//!         ColumnDescriptor::new("id", SqlType::Int).auto_increment_primary_key(),
//!         ColumnDescriptor::new("email", SqlType::VarChar).with_char_max_length(64),
//!     ],
//! );
//!
//! let (template, report) = tokio_test::block_on(build_row_template(
//!     &table,
//!     &OfflineSampleSource,
//!     &RegistryOptions::default(),
//! ))
//! .unwrap();
//! assert_eq!(template.column_names(), vec!["email"]);
//! assert_eq!(report.excluded().count(), 1);
//!
//! let mut rows = RowGenerator::new(Arc::new(template), 42);
//! let row = rows.next_row();
//! assert_eq!(row.len(), 1);
//! ```
//!
//! # Generators
//!
//! - `IntUniform` / `IntRange` - integers under a mask or in a range
//! - `DecimalUniform` - fixed-point numbers under a digit budget
//! - `StringSemantic` - names, emails, phones, cities... picked from the column name
//! - `DateWithinLastYear` / `DateTimeWithinLastYear` / `TimeOfDay`
//! - `EnumPick` - one of the declared enum/set values
//! - `SamplePick` - one of the sampled values of a referenced column
//! - `BinaryRandom` / `JsonRandom` / `Constant`

pub mod generator;
pub mod generators;
pub mod registry;
pub mod sample;
pub mod template;

// Re-exports for convenience
pub use generator::{Generator, GeneratorKind, NullPolicy};
pub use generators::string::SemanticHint;
pub use registry::{
    build_row_template, generator_for_column, BuildReport, ColumnOutcome, ExclusionReason,
    GeneratorError, Inclusion, RegistryOptions,
};
pub use sample::{OfflineSampleSource, SampleError, SampleSource, StaticSampleSource};
pub use template::{seed_for_pass, RowGenerator, RowIterator, RowTemplate, TemplateColumn};
