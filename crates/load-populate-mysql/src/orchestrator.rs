//! Concurrent bulk INSERT passes.
//!
//! One pass runs a fixed number of equally sized statements:
//!
//! ```text
//! producer (blocking) ──rows──▶ dispatcher ──statements──▶ workers (≤ concurrency)
//!                                                             │
//!                                              affected rows  ▼
//!                                                        aggregator ──▶ progress
//! ```

use crate::error::MySQLPopulatorError;
use crate::executor::{Statement, StatementExecutor};
use crate::planner::Pass;
use load_generator::{RowGenerator, RowTemplate};
use mysql_types::{InsertMode, InsertTemplate};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::debug;

/// Upper bound on rows buffered between the producer and the dispatcher.
pub const ROW_CHANNEL_CAPACITY: usize = 10_000;

/// Error messages kept per pass; further failures are only counted.
pub const MAX_RECORDED_ERRORS: usize = 100;

/// Result of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// Rows the server reported as inserted
    pub inserted: u64,
    /// Rows sent in statements
    pub attempted: u64,
    /// Statements dispatched
    pub statements: u64,
    /// Statements that failed
    pub failed: u64,
    /// Messages of the first failures
    pub errors: Vec<String>,
}

impl PassOutcome {
    fn record_error(&mut self, error: Option<String>) {
        if let Some(error) = error {
            self.failed += 1;
            if self.errors.len() < MAX_RECORDED_ERRORS {
                self.errors.push(error);
            }
        }
    }
}

/// Runs passes of INSERT statements against one table with bounded concurrency.
pub struct BulkInserter {
    executor: Arc<dyn StatementExecutor>,
    schema: String,
    table: String,
    concurrency: usize,
    progress: Option<mpsc::UnboundedSender<u64>>,
}

impl BulkInserter {
    pub fn new(
        executor: Arc<dyn StatementExecutor>,
        schema: impl Into<String>,
        table: impl Into<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            executor,
            schema: schema.into(),
            table: table.into(),
            concurrency: concurrency.max(1),
            progress: None,
        }
    }

    /// Send the affected-row count of every successful statement to `progress`.
    pub fn with_progress(mut self, progress: Option<mpsc::UnboundedSender<u64>>) -> Self {
        self.progress = progress;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `pass.batches` statements of `pass.rows_per_batch` rows each.
    ///
    /// Failed statements are logged and count as zero rows; they are not
    /// retried here.
    pub async fn run_pass(
        &self,
        template: &Arc<RowTemplate>,
        pass: Pass,
        mode: InsertMode,
        seed: u64,
    ) -> Result<PassOutcome, MySQLPopulatorError> {
        let total_rows = pass.rows();
        if total_rows == 0 {
            return Ok(PassOutcome::default());
        }

        debug!(
            "Starting pass: {} statements of {} rows ({}, seed={})",
            pass.batches, pass.rows_per_batch, mode, seed
        );

        let insert = InsertTemplate::new(&self.schema, &self.table, &template.column_names(), mode);
        let capacity = usize::try_from(total_rows)
            .unwrap_or(usize::MAX)
            .min(ROW_CHANNEL_CAPACITY);

        // Producer
        let (row_tx, mut row_rx) = mpsc::channel::<String>(capacity);
        let producer_template = Arc::clone(template);
        let producer = tokio::task::spawn_blocking(move || {
            let mut rows = RowGenerator::new(producer_template, seed);
            for row in rows.rendered_rows(total_rows) {
                if row_tx.blocking_send(row).is_err() {
                    break;
                }
            }
        });

        // Aggregator
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<u64>();
        let progress = self.progress.clone();
        let aggregator = tokio::spawn(async move {
            let mut inserted = 0u64;
            while let Some(affected) = result_rx.recv().await {
                inserted += affected;
                if affected > 0 {
                    if let Some(progress) = &progress {
                        let _ = progress.send(affected);
                    }
                }
            }
            inserted
        });

        // Dispatcher
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut workers = JoinSet::new();
        let mut outcome = PassOutcome::default();
        let mut batch: Vec<String> = Vec::new();

        while let Some(row) = row_rx.recv().await {
            batch.push(row);
            if batch.len() as u64 == pass.rows_per_batch {
                let statement = Statement {
                    sql: insert.render(batch.drain(..)),
                    rows: pass.rows_per_batch,
                };
                if !self
                    .dispatch(&semaphore, &mut workers, statement, &result_tx, &mut outcome)
                    .await
                {
                    break;
                }
            }

            while let Some(done) = workers.try_join_next() {
                outcome.record_error(done?);
            }
        }

        if !batch.is_empty() {
            let statement = Statement {
                rows: batch.len() as u64,
                sql: insert.render(batch.drain(..)),
            };
            self.dispatch(&semaphore, &mut workers, statement, &result_tx, &mut outcome)
                .await;
        }

        drop(row_rx);
        drop(result_tx);
        while let Some(done) = workers.join_next().await {
            outcome.record_error(done?);
        }
        producer.await?;
        outcome.inserted = aggregator.await?;

        debug!(
            "Pass finished: {} of {} rows inserted by {} statements ({} failed)",
            outcome.inserted, outcome.attempted, outcome.statements, outcome.failed
        );
        Ok(outcome)
    }

    /// Wait for a free worker slot and start executing `statement`.
    ///
    /// Returns `false` when no more statements can be dispatched.
    async fn dispatch(
        &self,
        semaphore: &Arc<Semaphore>,
        workers: &mut JoinSet<Option<String>>,
        statement: Statement,
        results: &mpsc::UnboundedSender<u64>,
        outcome: &mut PassOutcome,
    ) -> bool {
        let Ok(permit) = Arc::clone(semaphore).acquire_owned().await else {
            return false;
        };

        outcome.statements += 1;
        outcome.attempted += statement.rows;

        let executor = Arc::clone(&self.executor);
        let results = results.clone();
        workers.spawn(async move {
            let _permit = permit;
            match executor.execute(&statement).await {
                Ok(affected) => {
                    if affected > statement.rows {
                        debug!(
                            "Statement of {} rows reported {} affected rows",
                            statement.rows, affected
                        );
                    }
                    // A statement never adds more rows than it carries.
                    let _ = results.send(affected.min(statement.rows));
                    None
                }
                Err(e) => {
                    debug!("Statement of {} rows failed: {}", statement.rows, e);
                    let _ = results.send(0);
                    Some(e.to_string())
                }
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecError;
    use async_trait::async_trait;
    use load_core::{ColumnDescriptor, SqlType, Table};
    use load_generator::{build_row_template, OfflineSampleSource, RegistryOptions};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingExecutor {
        statements: Mutex<Vec<Statement>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_every: Option<usize>,
        panic_on_call: Option<usize>,
        affected_multiplier: Option<u64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StatementExecutor for RecordingExecutor {
        async fn execute(&self, statement: &Statement) -> Result<u64, ExecError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.statements.lock().unwrap().push(statement.clone());
            if self.panic_on_call == Some(call) {
                panic!("executor crashed on call {call}");
            }
            match self.fail_every {
                Some(n) if call % n == 0 => Err(ExecError::Rejected("duplicate".to_string())),
                _ => Ok(statement.rows * self.affected_multiplier.unwrap_or(1)),
            }
        }
    }

    async fn template() -> Arc<RowTemplate> {
        let table = Table::new(
            "shop",
            "items",
            vec![
                ColumnDescriptor::new("id", SqlType::Int).auto_increment_primary_key(),
                ColumnDescriptor::new("name", SqlType::VarChar).with_char_max_length(10),
                ColumnDescriptor::new("qty", SqlType::SmallInt),
            ],
        );
        let (template, _) =
            build_row_template(&table, &OfflineSampleSource, &RegistryOptions::default())
                .await
                .unwrap();
        Arc::new(template)
    }

    #[tokio::test]
    async fn test_pass_statement_shapes() {
        let executor = Arc::new(RecordingExecutor::default());
        let inserter = BulkInserter::new(executor.clone(), "shop", "items", 2);

        let pass = Pass {
            batches: 3,
            rows_per_batch: 4,
        };
        let outcome = inserter
            .run_pass(&template().await, pass, InsertMode::Ignore, 42)
            .await
            .unwrap();

        assert_eq!(outcome.statements, 3);
        assert_eq!(outcome.attempted, 12);
        assert_eq!(outcome.inserted, 12);
        assert!(outcome.errors.is_empty());

        let statements = executor.statements.lock().unwrap();
        assert_eq!(statements.len(), 3);
        for statement in statements.iter() {
            assert_eq!(statement.rows, 4);
            assert!(statement
                .sql
                .starts_with("INSERT IGNORE INTO `shop`.`items` (`name`, `qty`) VALUES ("));
            assert_eq!(statement.sql.matches("), (").count(), 3);
        }
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let executor = Arc::new(RecordingExecutor::default());
        let inserter = BulkInserter::new(executor.clone(), "shop", "items", 3);

        let pass = Pass {
            batches: 30,
            rows_per_batch: 2,
        };
        inserter
            .run_pass(&template().await, pass, InsertMode::Ignore, 1)
            .await
            .unwrap();

        assert!(executor.max_in_flight.load(Ordering::SeqCst) <= 3);
        assert_eq!(executor.statements.lock().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn test_failed_statements_count_zero() {
        let executor = Arc::new(RecordingExecutor {
            fail_every: Some(2),
            ..Default::default()
        });
        let inserter = BulkInserter::new(executor, "shop", "items", 1);

        let pass = Pass {
            batches: 4,
            rows_per_batch: 5,
        };
        let outcome = inserter
            .run_pass(&template().await, pass, InsertMode::Ignore, 7)
            .await
            .unwrap();

        assert_eq!(outcome.attempted, 20);
        assert_eq!(outcome.inserted, 10);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.errors, vec!["duplicate", "duplicate"]);
    }

    #[tokio::test]
    async fn test_progress_notifications() {
        let executor = Arc::new(RecordingExecutor::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let inserter = BulkInserter::new(executor, "shop", "items", 2).with_progress(Some(tx));

        let pass = Pass {
            batches: 5,
            rows_per_batch: 3,
        };
        inserter
            .run_pass(&template().await, pass, InsertMode::Strict, 3)
            .await
            .unwrap();
        drop(inserter);

        let mut notified = 0;
        while let Some(n) = rx.recv().await {
            assert_eq!(n, 3);
            notified += n;
        }
        assert_eq!(notified, 15);
    }

    #[tokio::test]
    async fn test_empty_pass() {
        let executor = Arc::new(RecordingExecutor::default());
        let inserter = BulkInserter::new(executor.clone(), "shop", "items", 2);

        let pass = Pass {
            batches: 0,
            rows_per_batch: 10,
        };
        let outcome = inserter
            .run_pass(&template().await, pass, InsertMode::Ignore, 3)
            .await
            .unwrap();

        assert_eq!(outcome, PassOutcome::default());
        assert!(executor.statements.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_worker_panic_fails_pass() {
        let executor = Arc::new(RecordingExecutor {
            panic_on_call: Some(2),
            ..Default::default()
        });
        let inserter = BulkInserter::new(executor, "shop", "items", 2);

        let pass = Pass {
            batches: 6,
            rows_per_batch: 3,
        };
        let result = inserter
            .run_pass(&template().await, pass, InsertMode::Ignore, 5)
            .await;

        assert!(matches!(result, Err(MySQLPopulatorError::Join(_))));
    }

    #[tokio::test]
    async fn test_affected_rows_capped_at_statement_size() {
        // ON DUPLICATE KEY style servers may count a row twice.
        let executor = Arc::new(RecordingExecutor {
            affected_multiplier: Some(2),
            ..Default::default()
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let inserter = BulkInserter::new(executor, "shop", "items", 2).with_progress(Some(tx));

        let pass = Pass {
            batches: 4,
            rows_per_batch: 5,
        };
        let outcome = inserter
            .run_pass(&template().await, pass, InsertMode::Ignore, 9)
            .await
            .unwrap();
        drop(inserter);

        assert_eq!(outcome.attempted, 20);
        assert_eq!(outcome.inserted, 20);

        let mut notified = 0;
        while let Some(n) = rx.recv().await {
            notified += n;
        }
        assert_eq!(notified, 20);
    }
}
