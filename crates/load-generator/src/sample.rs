//! Sources of existing values for foreign key columns.

use async_trait::async_trait;
use load_core::{ColumnDescriptor, ForeignKeyRef, GeneratedValue};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while sampling a referenced column.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Sampling query failed for {reference}: {message}")]
    Query { reference: String, message: String },

    #[error("Failed to decode sampled value from {reference}: {message}")]
    Decode { reference: String, message: String },

    #[error("No sample source available for {0}")]
    Unavailable(String),
}

/// Provides up to `limit` existing values of a referenced column.
///
/// `column` is the referencing column; its type drives how sampled values
/// are decoded. NULLs are never returned.
#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn sample(
        &self,
        reference: &ForeignKeyRef,
        column: &ColumnDescriptor,
        limit: usize,
    ) -> Result<Vec<GeneratedValue>, SampleError>;
}

/// Sample source used when no database is reachable. Every request fails,
/// so foreign key columns end up excluded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSampleSource;

#[async_trait]
impl SampleSource for OfflineSampleSource {
    async fn sample(
        &self,
        reference: &ForeignKeyRef,
        _column: &ColumnDescriptor,
        _limit: usize,
    ) -> Result<Vec<GeneratedValue>, SampleError> {
        Err(SampleError::Unavailable(reference.to_string()))
    }
}

/// Sample source backed by fixed values, keyed by referenced column.
#[derive(Debug, Clone, Default)]
pub struct StaticSampleSource {
    values: HashMap<ForeignKeyRef, Vec<GeneratedValue>>,
}

impl StaticSampleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(mut self, reference: ForeignKeyRef, values: Vec<GeneratedValue>) -> Self {
        self.values.insert(reference, values);
        self
    }
}

#[async_trait]
impl SampleSource for StaticSampleSource {
    async fn sample(
        &self,
        reference: &ForeignKeyRef,
        _column: &ColumnDescriptor,
        limit: usize,
    ) -> Result<Vec<GeneratedValue>, SampleError> {
        let values = self
            .values
            .get(reference)
            .ok_or_else(|| SampleError::Unavailable(reference.to_string()))?;
        Ok(values
            .iter()
            .filter(|v| !v.is_null())
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use load_core::SqlType;

    #[test]
    fn test_offline_source_fails() {
        let reference = ForeignKeyRef::new("shop", "customers", "id");
        let column = ColumnDescriptor::new("customer_id", SqlType::Int);

        let result = tokio_test::block_on(OfflineSampleSource.sample(&reference, &column, 100));
        assert!(matches!(result, Err(SampleError::Unavailable(_))));
    }

    #[test]
    fn test_static_source_limits_and_skips_nulls() {
        let reference = ForeignKeyRef::new("shop", "customers", "id");
        let column = ColumnDescriptor::new("customer_id", SqlType::Int);
        let source = StaticSampleSource::new().with_values(
            reference.clone(),
            vec![
                GeneratedValue::Int(1),
                GeneratedValue::Null,
                GeneratedValue::Int(2),
                GeneratedValue::Int(3),
            ],
        );

        let values = tokio_test::block_on(source.sample(&reference, &column, 2)).unwrap();
        assert_eq!(values, vec![GeneratedValue::Int(1), GeneratedValue::Int(2)]);
    }
}
