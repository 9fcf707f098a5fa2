//! Row templates and the seeded row generator.

use crate::generator::Generator;
use load_core::GeneratedValue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Derive the seed of pass number `pass` from the run's base seed.
///
/// Every pass (main, remainder, each retry) gets its own stream so retries
/// never replay the rows that already collided.
pub fn seed_for_pass(base_seed: u64, pass: u64) -> u64 {
    base_seed.wrapping_add(pass.wrapping_mul(SEED_STRIDE))
}

/// A column of the template with its generator.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateColumn {
    name: String,
    generator: Generator,
}

impl TemplateColumn {
    pub fn new(name: impl Into<String>, generator: Generator) -> Self {
        Self {
            name: name.into(),
            generator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }
}

/// Ordered generators for the insertable columns of a table.
///
/// Built once per run and shared read-only between tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTemplate {
    columns: Vec<TemplateColumn>,
}

impl RowTemplate {
    pub fn new(columns: Vec<TemplateColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[TemplateColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(TemplateColumn::name).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Generate one value per column, in column order.
    pub fn generate_row<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<GeneratedValue> {
        self.columns
            .iter()
            .map(|c| c.generator.generate(rng))
            .collect()
    }

    /// Generate one row as comma-separated SQL literals.
    pub fn render_row<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.columns
            .iter()
            .map(|c| c.generator.render(rng))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Seeded producer of rows from a shared template.
///
/// The same template and seed always yield the same rows.
pub struct RowGenerator {
    template: Arc<RowTemplate>,
    rng: StdRng,
    index: u64,
}

impl RowGenerator {
    pub fn new(template: Arc<RowTemplate>, seed: u64) -> Self {
        Self {
            template,
            rng: StdRng::seed_from_u64(seed),
            index: 0,
        }
    }

    pub fn template(&self) -> &RowTemplate {
        &self.template
    }

    /// Number of rows produced so far.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    pub fn next_row(&mut self) -> Vec<GeneratedValue> {
        self.index += 1;
        self.template.generate_row(&mut self.rng)
    }

    /// Next row rendered as comma-separated SQL literals.
    pub fn next_rendered(&mut self) -> String {
        self.index += 1;
        self.template.render_row(&mut self.rng)
    }

    /// Iterator over the next `count` rendered rows.
    pub fn rendered_rows(&mut self, count: u64) -> RowIterator<'_> {
        RowIterator {
            generator: self,
            remaining: count,
        }
    }
}

/// Iterator over rendered rows.
pub struct RowIterator<'a> {
    generator: &'a mut RowGenerator,
    remaining: u64,
}

impl Iterator for RowIterator<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.next_rendered())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}
