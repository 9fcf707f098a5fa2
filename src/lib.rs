//! random-data-load
//!
//! Fills an existing MySQL table with random rows that fit its column types,
//! sizes and nullability, using concurrent multi-row `INSERT IGNORE`
//! statements and single-row retries for rows dropped by key collisions.
//!
//! The loading itself lives in the workspace crates:
//!
//! - `load-core` - table, column and value types
//! - `mysql-types` - MySQL type mapping and statement text
//! - `load-generator` - per-column value generators and row templates
//! - `load-populate-mysql` - catalog reader, FK sampler, planner, bulk passes
//!   and retry loop
//!
//! This crate adds the command line: configuration resolution and progress
//! reporting.

pub mod config;
pub mod progress;

pub use config::{populate_options, resolve_target, Dsn, OptionFile, Target};
pub use progress::{spawn_progress_reporter, ProgressTracker};
