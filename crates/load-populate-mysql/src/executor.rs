//! Statement execution backends.

use crate::error::ExecError;
use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::Pool;
use std::io::Write;
use std::sync::Mutex;

/// One rendered INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    /// Rows in the VALUES list
    pub rows: u64,
}

/// Executes INSERT statements and reports how many rows were persisted.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(&self, statement: &Statement) -> Result<u64, ExecError>;
}

/// Executes statements on a pooled MySQL connection.
#[derive(Clone)]
pub struct MySQLExecutor {
    pool: Pool,
}

impl MySQLExecutor {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatementExecutor for MySQLExecutor {
    async fn execute(&self, statement: &Statement) -> Result<u64, ExecError> {
        let mut conn = self.pool.get_conn().await?;
        conn.query_drop(statement.sql.as_str()).await?;
        Ok(conn.affected_rows())
    }
}

/// Writes each statement, terminated by `;`, to a sink instead of running it.
pub struct DryRunExecutor {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl DryRunExecutor {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }
}

#[async_trait]
impl StatementExecutor for DryRunExecutor {
    async fn execute(&self, statement: &Statement) -> Result<u64, ExecError> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| ExecError::Rejected("dry-run sink poisoned".to_string()))?;
        sink.write_all(statement.sql.as_bytes())?;
        sink.write_all(b";\n")?;
        sink.flush()?;
        Ok(statement.rows)
    }
}
