//! Entry points tying planning, bulk passes and retries together.

use crate::catalog;
use crate::connect::{create_pool, ConnectionConfig};
use crate::error::MySQLPopulatorError;
use crate::executor::{DryRunExecutor, MySQLExecutor, StatementExecutor};
use crate::orchestrator::BulkInserter;
use crate::planner::InsertPlan;
use crate::retry;
use crate::sampler::MySQLSampleSource;
use load_core::Table;
use load_generator::{
    build_row_template, seed_for_pass, OfflineSampleSource, RegistryOptions, SampleSource,
};
use load_populate::default_concurrency;
use mysql_async::Pool;
use mysql_types::InsertMode;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How many rows to insert and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateOptions {
    /// Rows to insert
    pub rows: u64,
    /// Rows per statement; values below 1 mean the default
    pub bulk_size: i64,
    /// Statements in flight
    pub concurrency: usize,
    /// Single-row retry passes allowed after the bulk passes
    pub max_retries: u32,
    /// Base seed; every pass derives its own seed from it
    pub seed: u64,
    /// Values sampled per foreign key column
    pub sample_size: usize,
    /// NULL probability for nullable columns, in percent
    pub null_percent: u8,
}

impl Default for PopulateOptions {
    fn default() -> Self {
        let registry = RegistryOptions::default();
        Self {
            rows: 0,
            bulk_size: crate::planner::DEFAULT_BULK_SIZE as i64,
            concurrency: default_concurrency(),
            max_retries: 100,
            seed: 0,
            sample_size: registry.sample_size,
            null_percent: registry.null_percent,
        }
    }
}

impl PopulateOptions {
    fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            sample_size: self.sample_size,
            null_percent: self.null_percent,
        }
    }
}

/// Summary of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub requested: u64,
    pub inserted: u64,
    /// Retry passes run
    pub retries: u32,
    /// Columns left to their defaults, auto-increment keys included
    pub excluded_columns: Vec<String>,
    /// Failures that were not made up for
    pub errors: Vec<String>,
    pub elapsed: Duration,
}

impl PopulateReport {
    pub fn is_complete(&self) -> bool {
        self.inserted >= self.requested
    }

    /// Text telling the user the run fell short, one line per failure, or
    /// `None` when every requested row made it in.
    pub fn shortfall_message(&self) -> Option<String> {
        if self.is_complete() {
            return None;
        }
        let mut message = format!(
            "Only {} of {} rows were inserted",
            self.inserted, self.requested
        );
        for error in &self.errors {
            message.push_str("\n  ");
            message.push_str(error);
        }
        Some(message)
    }
}

/// Fill `table` with `options.rows` random rows through `executor`.
///
/// Runs the main and remainder passes with `INSERT IGNORE`, then, when
/// `retry_shortfall` is set, makes up for ignored rows with single-row
/// inserts.
pub async fn populate(
    executor: Arc<dyn StatementExecutor>,
    samples: &dyn SampleSource,
    table: &Table,
    options: &PopulateOptions,
    progress: Option<mpsc::UnboundedSender<u64>>,
    retry_shortfall: bool,
) -> Result<PopulateReport, MySQLPopulatorError> {
    let started = Instant::now();

    for trigger in &table.triggers {
        warn!(
            "Table {}.{} has trigger {} ({} {}): {}",
            table.schema, table.name, trigger.name, trigger.timing, trigger.event, trigger.statement
        );
    }

    let (template, build) =
        build_row_template(table, samples, &options.registry_options()).await?;
    let template = Arc::new(template);
    debug!("Generating columns: {:?}", template.column_names());

    let plan = InsertPlan::new(options.rows, options.bulk_size);
    info!(
        "Inserting {} rows into {}.{}: {} statements of {} rows, remainder {}",
        plan.target_rows(),
        table.schema,
        table.name,
        plan.full_batches(),
        plan.batch_size(),
        plan.remainder()
    );

    let inserter = BulkInserter::new(executor, &table.schema, &table.name, options.concurrency)
        .with_progress(progress);

    let mut report = PopulateReport {
        requested: options.rows,
        excluded_columns: build.excluded_columns(),
        ..Default::default()
    };

    for (pass_number, pass) in (0u64..).zip(plan.passes()) {
        let outcome = inserter
            .run_pass(
                &template,
                pass,
                InsertMode::Ignore,
                seed_for_pass(options.seed, pass_number),
            )
            .await?;
        report.inserted += outcome.inserted;
        report.errors.extend(outcome.errors);
    }

    if retry_shortfall && report.inserted < report.requested {
        let outcome = retry::ensure(
            &inserter,
            &template,
            report.requested,
            report.inserted,
            options.max_retries,
            options.seed,
        )
        .await?;
        report.inserted = outcome.achieved;
        report.retries = outcome.retries;
        report.errors.extend(outcome.errors);
    }

    // Failures that were made up for are not worth reporting.
    if report.is_complete() {
        report.errors.clear();
    }
    report.elapsed = started.elapsed();
    Ok(report)
}

/// Loads random rows into MySQL tables.
pub struct MySQLPopulator {
    pool: Option<Pool>,
    progress: Option<mpsc::UnboundedSender<u64>>,
}

impl MySQLPopulator {
    /// Create a populator with a connection pool.
    pub fn new(pool: Pool) -> Self {
        Self {
            pool: Some(pool),
            progress: None,
        }
    }

    /// Create a populator connected as described by `config`.
    pub fn connect(config: &ConnectionConfig) -> Self {
        info!("Connecting to {}", config);
        Self::new(create_pool(config))
    }

    /// Create a populator without a server; only [`Self::dry_run`] works and
    /// foreign key columns are left out.
    pub fn offline() -> Self {
        Self {
            pool: None,
            progress: None,
        }
    }

    /// Receive the number of newly inserted rows after each statement.
    pub fn with_progress(mut self, progress: mpsc::UnboundedSender<u64>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn pool(&self) -> Result<&Pool, MySQLPopulatorError> {
        self.pool
            .as_ref()
            .ok_or_else(|| MySQLPopulatorError::Config("no MySQL connection configured".into()))
    }

    /// Read the layout of `schema`.`table` from the server.
    pub async fn load_table(&self, schema: &str, table: &str) -> Result<Table, MySQLPopulatorError> {
        let mut conn = self.pool()?.get_conn().await?;
        Ok(catalog::load_table(&mut conn, schema, table).await?)
    }

    /// Insert `options.rows` rows into `table`.
    pub async fn run(
        &self,
        table: &Table,
        options: &PopulateOptions,
    ) -> Result<PopulateReport, MySQLPopulatorError> {
        let pool = self.pool()?;
        let executor = Arc::new(MySQLExecutor::new(pool.clone()));
        let samples = MySQLSampleSource::new(pool.clone());

        populate(executor, &samples, table, options, self.progress.clone(), true).await
    }

    /// Write the statements `run` would execute to `sink` instead.
    ///
    /// Statements are written one at a time, in generation order.
    pub async fn dry_run(
        &self,
        table: &Table,
        options: &PopulateOptions,
        sink: Box<dyn Write + Send>,
    ) -> Result<PopulateReport, MySQLPopulatorError> {
        let executor = Arc::new(DryRunExecutor::new(sink));
        let options = PopulateOptions {
            concurrency: 1,
            ..options.clone()
        };

        match &self.pool {
            Some(pool) => {
                let samples = MySQLSampleSource::new(pool.clone());
                populate(executor, &samples, table, &options, self.progress.clone(), false).await
            }
            None => {
                populate(
                    executor,
                    &OfflineSampleSource,
                    table,
                    &options,
                    self.progress.clone(),
                    false,
                )
                .await
            }
        }
    }

    /// Close the pool, waiting for connections to be returned.
    pub async fn disconnect(self) -> Result<(), MySQLPopulatorError> {
        if let Some(pool) = self.pool {
            pool.disconnect().await?;
        }
        Ok(())
    }
}
