//! Progress lines for a running load.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Tracks confirmed rows and decides when a progress line is due: each time
/// another tenth of the target is reached, and at completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    total: u64,
    done: u64,
    next_step: u64,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            done: 0,
            next_step: 1,
        }
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    /// Record `rows` newly inserted rows; returns a line to print, if any.
    pub fn record(&mut self, rows: u64) -> Option<String> {
        self.done = self.done.saturating_add(rows);
        if self.total == 0 || self.next_step > 10 {
            return None;
        }

        let reached = (self.done.min(self.total) * 10 / self.total).min(10);
        if reached < self.next_step {
            return None;
        }
        self.next_step = reached + 1;
        Some(format!("Writing ({}/{}) rows...", self.done, self.total))
    }
}

/// Spawn a task logging progress from `updates` until every sender is dropped.
/// Resolves to the number of rows reported.
pub fn spawn_progress_reporter(
    total: u64,
    mut updates: mpsc::UnboundedReceiver<u64>,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut tracker = ProgressTracker::new(total);
        while let Some(rows) = updates.recv().await {
            if let Some(line) = tracker.record(rows) {
                info!("{line}");
            }
        }
        tracker.done()
    })
}
