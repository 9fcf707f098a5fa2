//! Makes up for rows dropped by `INSERT IGNORE`.

use crate::error::MySQLPopulatorError;
use crate::orchestrator::{BulkInserter, MAX_RECORDED_ERRORS};
use crate::planner::Pass;
use load_generator::{seed_for_pass, RowTemplate};
use mysql_types::InsertMode;
use std::sync::Arc;
use tracing::{info, warn};

/// Pass number of the first retry; the main and remainder passes come first.
pub const FIRST_RETRY_PASS: u64 = 2;

/// Result of the retry loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryOutcome {
    /// Rows inserted overall, including those inserted before the loop
    pub achieved: u64,
    /// Retry passes run
    pub retries: u32,
    /// Messages of the first failed retry statements
    pub errors: Vec<String>,
}

/// Insert the shortfall between `achieved_rows` and `target_rows` one row per
/// statement with plain `INSERT`, until the target is met or `max_retries`
/// passes have run.
///
/// Every pass draws fresh rows from its own seed. A pass that inserts nothing
/// still uses up one retry.
pub async fn ensure(
    inserter: &BulkInserter,
    template: &Arc<RowTemplate>,
    target_rows: u64,
    achieved_rows: u64,
    max_retries: u32,
    base_seed: u64,
) -> Result<RetryOutcome, MySQLPopulatorError> {
    let mut outcome = RetryOutcome {
        achieved: achieved_rows,
        ..Default::default()
    };

    while outcome.achieved < target_rows && outcome.retries < max_retries {
        let deficit = target_rows - outcome.achieved;
        outcome.retries += 1;
        info!(
            "{} rows were not inserted, retrying ({}/{})",
            deficit, outcome.retries, max_retries
        );

        let seed = seed_for_pass(base_seed, FIRST_RETRY_PASS + u64::from(outcome.retries) - 1);
        let pass = Pass {
            batches: deficit,
            rows_per_batch: 1,
        };
        let result = inserter
            .run_pass(template, pass, InsertMode::Strict, seed)
            .await?;

        outcome.achieved += result.inserted;
        for error in result.errors {
            if outcome.errors.len() >= MAX_RECORDED_ERRORS {
                break;
            }
            outcome.errors.push(error);
        }
    }

    if outcome.achieved < target_rows {
        warn!(
            "Retry budget exhausted: {} of {} rows inserted after {} retries",
            outcome.achieved, target_rows, outcome.retries
        );
    }

    Ok(outcome)
}
