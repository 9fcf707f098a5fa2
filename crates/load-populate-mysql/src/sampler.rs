//! Samples existing values of referenced columns.

use async_trait::async_trait;
use load_core::{ColumnDescriptor, ForeignKeyRef, GeneratedValue};
use load_generator::{SampleError, SampleSource};
use mysql_async::prelude::*;
use mysql_async::{Pool, Value};
use mysql_types::{decode_value, qualified_table_name, quote_identifier};

/// Share of rows considered by the probabilistic scan on large tables.
pub const SCAN_SELECTIVITY: f64 = 0.3;

/// [`SampleSource`] reading the referenced table on the server.
///
/// Small tables are read whole. Larger ones are scanned with
/// `RAND() <= 0.3` and cut at the limit, so the sample is bounded but not
/// uniform: early rows are favoured.
#[derive(Clone)]
pub struct MySQLSampleSource {
    pool: Pool,
}

impl MySQLSampleSource {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// `SELECT COUNT(*)` of the referenced table.
pub fn count_query(reference: &ForeignKeyRef) -> String {
    format!(
        "SELECT COUNT(*) FROM {}",
        qualified_table_name(&reference.schema, &reference.table)
    )
}

/// Query fetching at most `limit` non-NULL values of the referenced column,
/// given the referenced table holds `rows` rows.
pub fn sample_query(reference: &ForeignKeyRef, limit: usize, rows: u64) -> String {
    let column = quote_identifier(&reference.column);
    let table = qualified_table_name(&reference.schema, &reference.table);

    if rows < limit as u64 {
        format!("SELECT DISTINCT {column} FROM {table} WHERE {column} IS NOT NULL")
    } else {
        format!(
            "SELECT {column} FROM {table} WHERE {column} IS NOT NULL AND RAND() <= {SCAN_SELECTIVITY} LIMIT {limit}"
        )
    }
}

#[async_trait]
impl SampleSource for MySQLSampleSource {
    async fn sample(
        &self,
        reference: &ForeignKeyRef,
        column: &ColumnDescriptor,
        limit: usize,
    ) -> Result<Vec<GeneratedValue>, SampleError> {
        let query_error = |e: mysql_async::Error| SampleError::Query {
            reference: reference.to_string(),
            message: e.to_string(),
        };

        let mut conn = self.pool.get_conn().await.map_err(query_error)?;
        let rows: Option<u64> = conn
            .query_first(count_query(reference))
            .await
            .map_err(query_error)?;
        let rows = rows.unwrap_or(0);
        if rows == 0 || limit == 0 {
            return Ok(Vec::new());
        }

        let values: Vec<Value> = conn
            .query(sample_query(reference, limit, rows))
            .await
            .map_err(query_error)?;

        let mut samples = Vec::with_capacity(values.len());
        for value in values {
            let decoded = decode_value(value, &column.sql_type, column.numeric_scale).map_err(
                |e| SampleError::Decode {
                    reference: reference.to_string(),
                    message: e.to_string(),
                },
            )?;
            if !decoded.is_null() {
                samples.push(decoded);
            }
        }
        Ok(samples)
    }
}
