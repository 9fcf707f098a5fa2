//! MySQL populator for random-data-load.
//!
//! Fills an existing MySQL table with random rows that respect each column's
//! type, size and nullability:
//!
//! 1. [`catalog::load_table`] reads the table layout from `information_schema`.
//! 2. [`load_generator::build_row_template`] picks a generator per column,
//!    sampling referenced tables through [`MySQLSampleSource`] for foreign keys.
//! 3. [`InsertPlan`] splits the row target into equally sized statements plus
//!    a remainder.
//! 4. [`BulkInserter`] runs each pass of `INSERT IGNORE` statements with
//!    bounded concurrency and sums the rows the server actually inserted.
//! 5. [`retry::ensure`] makes up for ignored rows with single-row inserts.
//!
//! [`MySQLPopulator`] wires these together; [`populate`] does the same for
//! any [`StatementExecutor`] and [`load_generator::SampleSource`].

pub mod args;
pub mod catalog;
pub mod connect;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod planner;
pub mod populator;
pub mod retry;
pub mod sampler;

pub use args::{CommonPopulateArgs, MySQLPopulateArgs};
pub use connect::{create_pool, mask_connection_password, ConnectionConfig, DEFAULT_PORT};
pub use error::{CatalogError, ExecError, MySQLPopulatorError};
pub use executor::{DryRunExecutor, MySQLExecutor, Statement, StatementExecutor};
pub use orchestrator::{BulkInserter, PassOutcome};
pub use planner::{InsertPlan, Pass, DEFAULT_BULK_SIZE};
pub use populator::{populate, MySQLPopulator, PopulateOptions, PopulateReport};
pub use retry::RetryOutcome;
pub use sampler::MySQLSampleSource;
