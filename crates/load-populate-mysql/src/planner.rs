//! Splits a row target into equally sized statements plus a remainder.

/// Rows per statement when no usable bulk size is given.
pub const DEFAULT_BULK_SIZE: u64 = 1000;

/// How a row target is split into INSERT statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertPlan {
    target_rows: u64,
    batch_size: u64,
    full_batches: u64,
    remainder: u64,
}

/// One pass of equally sized statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    pub batches: u64,
    pub rows_per_batch: u64,
}

impl Pass {
    pub fn rows(&self) -> u64 {
        self.batches * self.rows_per_batch
    }
}

impl InsertPlan {
    /// Plan `target_rows` rows in statements of `bulk_size` rows.
    ///
    /// A bulk size below 1 falls back to [`DEFAULT_BULK_SIZE`]; a bulk size
    /// above the target is clamped to it.
    pub fn new(target_rows: u64, bulk_size: i64) -> Self {
        let mut batch_size = u64::try_from(bulk_size)
            .ok()
            .filter(|b| *b >= 1)
            .unwrap_or(DEFAULT_BULK_SIZE);
        if target_rows > 0 && batch_size > target_rows {
            batch_size = target_rows;
        }

        let full_batches = target_rows / batch_size;
        Self {
            target_rows,
            batch_size,
            full_batches,
            remainder: target_rows - full_batches * batch_size,
        }
    }

    pub fn target_rows(&self) -> u64 {
        self.target_rows
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn full_batches(&self) -> u64 {
        self.full_batches
    }

    pub fn remainder(&self) -> u64 {
        self.remainder
    }

    /// The main pass and, when the remainder is non-zero, a single-statement
    /// remainder pass. Empty for a zero target.
    pub fn passes(&self) -> Vec<Pass> {
        let mut passes = Vec::with_capacity(2);
        if self.full_batches > 0 {
            passes.push(Pass {
                batches: self.full_batches,
                rows_per_batch: self.batch_size,
            });
        }
        if self.remainder > 0 {
            passes.push(Pass {
                batches: 1,
                rows_per_batch: self.remainder,
            });
        }
        passes
    }
}
