//! INSERT statement text.
//!
//! Statements are built with values spliced in as literals: the number of rows
//! per statement varies between passes, and literal interpolation avoids
//! preparing a new statement shape for every batch size.

use std::fmt;

/// How duplicate-key conflicts are handled by the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// `INSERT IGNORE`: conflicting rows are silently dropped
    Ignore,
    /// Plain `INSERT`: a conflict fails the statement
    Strict,
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignore => f.write_str("INSERT IGNORE"),
            Self::Strict => f.write_str("INSERT"),
        }
    }
}

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `schema`.`table`
pub fn qualified_table_name(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_identifier(schema), quote_identifier(table))
}

/// Reusable `INSERT ... VALUES` prefix for one table and column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertTemplate {
    prefix: String,
    columns: usize,
}

impl InsertTemplate {
    pub fn new<S: AsRef<str>>(schema: &str, table: &str, columns: &[S], mode: InsertMode) -> Self {
        let column_list = columns
            .iter()
            .map(|c| quote_identifier(c.as_ref()))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            prefix: format!(
                "{mode} INTO {} ({column_list}) VALUES ",
                qualified_table_name(schema, table)
            ),
            columns: columns.len(),
        }
    }

    /// Everything up to and including `VALUES `.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Render a statement from pre-rendered rows.
    ///
    /// Each row is the comma-separated literal list without parentheses.
    pub fn render<I, S>(&self, rows: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sql = self.prefix.clone();
        for (i, row) in rows.into_iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            sql.push_str(row.as_ref());
            sql.push(')');
        }
        sql
    }
}
