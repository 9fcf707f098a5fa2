//! Error types for the MySQL populator.

use load_generator::GeneratorError;
use thiserror::Error;

/// Errors that can occur during MySQL population.
#[derive(Error, Debug)]
pub enum MySQLPopulatorError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// Schema introspection error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// No row template could be built.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed writing dry-run output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A producer or worker task panicked.
    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors reading the table layout from `information_schema`.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    #[error("Table '{schema}.{table}' not found")]
    TableNotFound { schema: String, table: String },

    #[error("Missing or invalid {0} in catalog row")]
    InvalidRow(&'static str),
}

/// Failure of a single INSERT statement.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Rejected(String),
}
