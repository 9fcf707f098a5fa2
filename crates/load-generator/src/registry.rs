//! Maps the columns of a table to generators.

use crate::generator::{Generator, NullPolicy};
use crate::sample::SampleSource;
use crate::template::{RowTemplate, TemplateColumn};
use chrono::{Datelike, Utc};
use load_core::{ColumnDescriptor, SqlType, Table};
use std::fmt;
use tracing::{debug, warn};

/// Upper bound on generated binary strings, whatever the column allows.
pub const MAX_BINARY_LEN: usize = 1024;

/// Digit budget for float and double columns declared without a precision.
pub const DEFAULT_FLOAT_DIGITS: u32 = 10;

/// Scale for float and double columns declared without one.
pub const DEFAULT_FLOAT_SCALE: u32 = 2;

/// Length bound for character columns that report no maximum length.
pub const DEFAULT_CHAR_LEN: usize = 255;

/// Error type for template construction.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Every column was excluded, so no INSERT can be built
    #[error("Table '{table}' has no column the loader can generate values for")]
    NoInsertableColumns { table: String },
}

/// Tunables for template construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Number of existing values fetched per foreign key column
    pub sample_size: usize,
    /// NULL probability for nullable columns, in percent
    pub null_percent: u8,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            sample_size: 100,
            null_percent: NullPolicy::DEFAULT_NULL_PERCENT,
        }
    }
}

/// Why a column gets no generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    AutoIncrementPrimaryKey,
    UnsupportedType(String),
    EmptyEnum,
    SampleFailed(String),
    EmptyReferencedTable,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoIncrementPrimaryKey => write!(f, "auto-increment primary key"),
            Self::UnsupportedType(t) => write!(f, "unsupported type '{t}'"),
            Self::EmptyEnum => write!(f, "enum/set without values"),
            Self::SampleFailed(e) => write!(f, "cannot sample referenced column: {e}"),
            Self::EmptyReferencedTable => write!(f, "referenced table is empty"),
        }
    }
}

/// Whether a column made it into the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inclusion {
    Included,
    Excluded(ExclusionReason),
}

/// Outcome of template construction for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOutcome {
    pub column: String,
    pub outcome: Inclusion,
}

impl ColumnOutcome {
    pub fn is_excluded(&self) -> bool {
        matches!(self.outcome, Inclusion::Excluded(_))
    }

    pub fn reason(&self) -> Option<&ExclusionReason> {
        match &self.outcome {
            Inclusion::Excluded(reason) => Some(reason),
            Inclusion::Included => None,
        }
    }
}

/// Per-column outcomes of [`build_row_template`], in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    outcomes: Vec<ColumnOutcome>,
}

impl BuildReport {
    pub fn outcomes(&self) -> &[ColumnOutcome] {
        &self.outcomes
    }

    pub fn excluded(&self) -> impl Iterator<Item = &ColumnOutcome> {
        self.outcomes.iter().filter(|o| o.is_excluded())
    }

    /// Names of the excluded columns, auto-increment keys included.
    pub fn excluded_columns(&self) -> Vec<String> {
        self.excluded().map(|o| o.column.clone()).collect()
    }

    fn push(&mut self, column: &str, outcome: Inclusion) {
        self.outcomes.push(ColumnOutcome {
            column: column.to_string(),
            outcome,
        });
    }
}

/// Pick the generator for a column from its type.
///
/// Foreign key columns are handled by [`build_row_template`], which samples
/// the referenced column instead.
pub fn generator_for_column(
    column: &ColumnDescriptor,
    options: &RegistryOptions,
) -> Result<Generator, ExclusionReason> {
    if column.auto_increment_primary_key {
        return Err(ExclusionReason::AutoIncrementPrimaryKey);
    }

    let nulls = NullPolicy::nullable(column.nullable).with_percent(options.null_percent);

    let generator = match &column.sql_type {
        SqlType::TinyInt => Generator::int_uniform(0xF, nulls),
        SqlType::SmallInt => Generator::int_uniform(0xFF, nulls),
        SqlType::MediumInt => Generator::int_uniform(0x7FFFF, nulls),
        SqlType::Int => Generator::int_uniform(0x7FFF_FFFF, nulls),
        SqlType::BigInt => Generator::int_uniform(i64::MAX, nulls),
        SqlType::Decimal => Generator::decimal_uniform(
            column.integer_digits().unwrap_or(DEFAULT_FLOAT_DIGITS),
            column.numeric_scale.unwrap_or(0),
            nulls,
        ),
        SqlType::Float | SqlType::Double => Generator::decimal_uniform(
            column.integer_digits().unwrap_or(DEFAULT_FLOAT_DIGITS),
            column.numeric_scale.unwrap_or(DEFAULT_FLOAT_SCALE),
            nulls,
        ),
        SqlType::Char | SqlType::VarChar | SqlType::Text => Generator::string_for_column(
            &column.name,
            max_len(column.char_max_length, DEFAULT_CHAR_LEN),
            nulls,
        ),
        SqlType::Binary | SqlType::VarBinary | SqlType::Blob => Generator::binary_random(
            max_len(column.char_max_length, MAX_BINARY_LEN).min(MAX_BINARY_LEN),
            nulls,
        ),
        SqlType::Date => Generator::date_within_last_year(nulls),
        SqlType::DateTime | SqlType::Timestamp => Generator::datetime_within_last_year(nulls),
        SqlType::Time => Generator::time_of_day(nulls),
        SqlType::Year => {
            let year = i64::from(Utc::now().year());
            Generator::int_range(year - 1, year, nulls)
        }
        SqlType::Enum | SqlType::Set => {
            if column.enum_values.is_empty() {
                return Err(ExclusionReason::EmptyEnum);
            }
            Generator::enum_pick(column.enum_values.clone(), nulls)
        }
        SqlType::Json => Generator::json_random(nulls),
        SqlType::Unsupported(name) => {
            return Err(ExclusionReason::UnsupportedType(name.clone()));
        }
    };

    Ok(generator)
}

fn max_len(declared: Option<u64>, default: usize) -> usize {
    declared
        .map(|len| usize::try_from(len).unwrap_or(usize::MAX))
        .unwrap_or(default)
}

/// Build the row template for `table`.
///
/// Columns that cannot be generated are left out of the template and
/// reported in the [`BuildReport`] with a logged warning. Foreign key
/// columns draw from values sampled through `samples`.
pub async fn build_row_template(
    table: &Table,
    samples: &dyn SampleSource,
    options: &RegistryOptions,
) -> Result<(RowTemplate, BuildReport), GeneratorError> {
    let mut columns = Vec::new();
    let mut report = BuildReport::default();

    for column in &table.columns {
        let result = match (&column.foreign_key, column.auto_increment_primary_key) {
            (Some(reference), false) => {
                match samples.sample(reference, column, options.sample_size).await {
                    Ok(values) if values.is_empty() => Err(ExclusionReason::EmptyReferencedTable),
                    Ok(values) => {
                        debug!(
                            "Sampled {} values from {} for column {}",
                            values.len(),
                            reference,
                            column.name
                        );
                        let nulls = NullPolicy::nullable(column.nullable)
                            .with_percent(options.null_percent);
                        Ok(Generator::sample_pick(values, nulls))
                    }
                    Err(e) => Err(ExclusionReason::SampleFailed(e.to_string())),
                }
            }
            _ => generator_for_column(column, options),
        };

        match result {
            Ok(generator) => {
                columns.push(TemplateColumn::new(column.name.clone(), generator));
                report.push(&column.name, Inclusion::Included);
            }
            Err(ExclusionReason::AutoIncrementPrimaryKey) => {
                debug!("Skipping auto-increment primary key {}", column.name);
                report.push(
                    &column.name,
                    Inclusion::Excluded(ExclusionReason::AutoIncrementPrimaryKey),
                );
            }
            Err(reason) => {
                warn!(
                    "Excluding column {}.{}: {}",
                    table.name, column.name, reason
                );
                report.push(&column.name, Inclusion::Excluded(reason));
            }
        }
    }

    if columns.is_empty() {
        return Err(GeneratorError::NoInsertableColumns {
            table: table.name.clone(),
        });
    }

    Ok((RowTemplate::new(columns), report))
}
