//! The `Generator` type: one column's value producer.

use crate::generators::{binary, json, numeric, pick, string, temporal};
use crate::generators::string::SemanticHint;
use chrono::{NaiveDateTime, NaiveTime, Utc};
use load_core::GeneratedValue;
use rand::Rng;

/// When a generator emits SQL NULL instead of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullPolicy {
    allow_null: bool,
    null_percent: u8,
}

impl NullPolicy {
    /// Share of NULLs produced by nullable columns unless configured otherwise.
    pub const DEFAULT_NULL_PERCENT: u8 = 10;

    /// NULL with the default probability when `allow_null` is true.
    pub fn nullable(allow_null: bool) -> Self {
        Self {
            allow_null,
            null_percent: Self::DEFAULT_NULL_PERCENT,
        }
    }

    /// Never NULL.
    pub fn never() -> Self {
        Self::nullable(false)
    }

    /// Set the NULL probability in percent (capped at 100).
    pub fn with_percent(mut self, null_percent: u8) -> Self {
        self.null_percent = null_percent.min(100);
        self
    }

    pub fn allow_null(&self) -> bool {
        self.allow_null
    }

    pub fn null_percent(&self) -> u8 {
        self.null_percent
    }

    /// Decide whether this invocation yields NULL.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.allow_null && self.null_percent > 0 && rng.random_range(0..100u8) < self.null_percent
    }
}

impl Default for NullPolicy {
    fn default() -> Self {
        Self::never()
    }
}

/// Anchor of the "last year" generators. Day granularity keeps a seeded run
/// reproducible for the rest of the day.
fn start_of_today() -> NaiveDateTime {
    Utc::now().date_naive().and_time(NaiveTime::MIN)
}

/// What a generator produces, with its construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorKind {
    /// Integer in `0 ..= max`
    IntUniform { max: i64 },
    /// Integer in `min ..= max`
    IntRange { min: i64, max: i64 },
    /// Non-negative fixed-point number with at most `integer_digits` digits
    /// before the decimal point and `scale` after it
    DecimalUniform { integer_digits: u32, scale: u32 },
    /// Plausible text for the column, at most `max_len` characters
    StringSemantic { max_len: usize, hint: SemanticHint },
    /// Date in the year before `until`
    DateWithinLastYear { until: NaiveDateTime },
    /// Date and time in the year before `until`
    DateTimeWithinLastYear { until: NaiveDateTime },
    /// Time of day
    TimeOfDay,
    /// One of the declared values
    EnumPick { values: Vec<String> },
    /// One of the values sampled from a referenced column
    SamplePick { samples: Vec<GeneratedValue> },
    /// Random bytes, at most `max_len` of them
    BinaryRandom { max_len: usize },
    /// Small random JSON object
    JsonRandom,
    /// Always the same value
    Constant { value: GeneratedValue },
}

/// Value producer for one column.
///
/// Generators hold no state besides their construction parameters and take
/// the random source as an argument, so a single instance can be shared by
/// any number of tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    kind: GeneratorKind,
    nulls: NullPolicy,
}

impl Generator {
    pub fn new(kind: GeneratorKind, nulls: NullPolicy) -> Self {
        Self { kind, nulls }
    }

    pub fn int_uniform(max: i64, nulls: NullPolicy) -> Self {
        Self::new(GeneratorKind::IntUniform { max: max.max(0) }, nulls)
    }

    /// Bounds are swapped if given in the wrong order.
    pub fn int_range(min: i64, max: i64, nulls: NullPolicy) -> Self {
        Self::new(
            GeneratorKind::IntRange {
                min: min.min(max),
                max: max.max(min),
            },
            nulls,
        )
    }

    pub fn decimal_uniform(integer_digits: u32, scale: u32, nulls: NullPolicy) -> Self {
        Self::new(
            GeneratorKind::DecimalUniform {
                integer_digits: integer_digits.min(numeric::MAX_INTEGER_DIGITS),
                scale: scale.min(numeric::MAX_SCALE),
            },
            nulls,
        )
    }

    /// String generator whose flavour is picked from the column name.
    pub fn string_for_column(column_name: &str, max_len: usize, nulls: NullPolicy) -> Self {
        Self::new(
            GeneratorKind::StringSemantic {
                max_len,
                hint: SemanticHint::from_column_name(column_name),
            },
            nulls,
        )
    }

    pub fn date_within_last_year(nulls: NullPolicy) -> Self {
        Self::new(
            GeneratorKind::DateWithinLastYear {
                until: start_of_today(),
            },
            nulls,
        )
    }

    pub fn datetime_within_last_year(nulls: NullPolicy) -> Self {
        Self::new(
            GeneratorKind::DateTimeWithinLastYear {
                until: start_of_today(),
            },
            nulls,
        )
    }

    pub fn time_of_day(nulls: NullPolicy) -> Self {
        Self::new(GeneratorKind::TimeOfDay, nulls)
    }

    pub fn enum_pick(values: Vec<String>, nulls: NullPolicy) -> Self {
        Self::new(GeneratorKind::EnumPick { values }, nulls)
    }

    pub fn sample_pick(samples: Vec<GeneratedValue>, nulls: NullPolicy) -> Self {
        Self::new(GeneratorKind::SamplePick { samples }, nulls)
    }

    pub fn binary_random(max_len: usize, nulls: NullPolicy) -> Self {
        Self::new(GeneratorKind::BinaryRandom { max_len }, nulls)
    }

    pub fn json_random(nulls: NullPolicy) -> Self {
        Self::new(GeneratorKind::JsonRandom, nulls)
    }

    /// Fixed value; never NULL unless the value itself is NULL.
    pub fn constant(value: GeneratedValue) -> Self {
        Self::new(GeneratorKind::Constant { value }, NullPolicy::never())
    }

    pub fn kind(&self) -> &GeneratorKind {
        &self.kind
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.nulls
    }

    /// Produce one value.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratedValue {
        if self.nulls.roll(rng) {
            return GeneratedValue::Null;
        }

        match &self.kind {
            GeneratorKind::IntUniform { max } => numeric::generate_int_range(rng, 0, *max),
            GeneratorKind::IntRange { min, max } => numeric::generate_int_range(rng, *min, *max),
            GeneratorKind::DecimalUniform {
                integer_digits,
                scale,
            } => numeric::generate_decimal(rng, *integer_digits, *scale),
            GeneratorKind::StringSemantic { max_len, hint } => {
                string::generate_semantic(rng, *hint, *max_len)
            }
            GeneratorKind::DateWithinLastYear { until } => {
                temporal::generate_date_within_last_year(rng, *until)
            }
            GeneratorKind::DateTimeWithinLastYear { until } => {
                temporal::generate_datetime_within_last_year(rng, *until)
            }
            GeneratorKind::TimeOfDay => temporal::generate_time_of_day(rng),
            GeneratorKind::EnumPick { values } => pick::pick_string(rng, values),
            GeneratorKind::SamplePick { samples } => pick::pick_value(rng, samples),
            GeneratorKind::BinaryRandom { max_len } => binary::generate_bytes(rng, *max_len),
            GeneratorKind::JsonRandom => json::generate_json(rng),
            GeneratorKind::Constant { value } => value.clone(),
        }
    }

    /// Produce one value rendered as a SQL literal.
    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.generate(rng).to_sql_literal()
    }
}
