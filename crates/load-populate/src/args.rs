//! Common CLI argument definitions shared by all populators.

use clap::Args;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Number of statement workers when `--concurrency` is not given.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Common arguments shared by all populators.
#[derive(Args, Clone, Debug)]
pub struct CommonPopulateArgs {
    /// Number of rows to insert
    #[arg(long)]
    pub rows: u64,

    /// Rows per INSERT statement (values below 1 fall back to the default)
    #[arg(long, default_value = "1000", allow_negative_numbers = true)]
    pub bulk_size: i64,

    /// Maximum number of statements in flight (default: available parallelism)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Maximum number of single-row retry passes used to make up for ignored rows
    #[arg(long, default_value = "100")]
    pub max_retries: u32,

    /// Random seed for reproducible data (default: random)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of existing values sampled for each foreign key column
    #[arg(long, default_value = "100")]
    pub sample_size: usize,

    /// Percentage of NULLs generated for nullable columns
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub null_percent: u8,

    /// Print the INSERT statements instead of executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Do not report progress
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Read the table layout from a YAML file instead of the database (dry runs only)
    #[arg(long, requires = "dry_run")]
    pub table_definition: Option<PathBuf>,
}

impl CommonPopulateArgs {
    /// Effective concurrency, never below 1.
    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(default_concurrency).max(1)
    }
}
