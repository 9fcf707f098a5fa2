//! Reads the layout of the target table from `information_schema`.

use crate::error::CatalogError;
use load_core::{ForeignKeyRef, Index, Table, Trigger};
use mysql_async::prelude::*;
use mysql_async::{Conn, Row};
use mysql_types::InformationSchemaColumn;
use tracing::debug;

const COLUMNS_QUERY: &str = "
    SELECT COLUMN_NAME, IS_NULLABLE, DATA_TYPE, COLUMN_TYPE, CHARACTER_MAXIMUM_LENGTH,
           NUMERIC_PRECISION, NUMERIC_SCALE, COLUMN_KEY, EXTRA
    FROM information_schema.COLUMNS
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION";

const FOREIGN_KEYS_QUERY: &str = "
    SELECT COLUMN_NAME, REFERENCED_TABLE_SCHEMA, REFERENCED_TABLE_NAME, REFERENCED_COLUMN_NAME
    FROM information_schema.KEY_COLUMN_USAGE
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        AND REFERENCED_TABLE_NAME IS NOT NULL
    ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION";

const INDEXES_QUERY: &str = "
    SELECT INDEX_NAME, NON_UNIQUE, COLUMN_NAME
    FROM information_schema.STATISTICS
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
    ORDER BY INDEX_NAME, SEQ_IN_INDEX";

const TRIGGERS_QUERY: &str = "
    SELECT TRIGGER_NAME, ACTION_TIMING, EVENT_MANIPULATION, ACTION_STATEMENT
    FROM information_schema.TRIGGERS
    WHERE EVENT_OBJECT_SCHEMA = ? AND EVENT_OBJECT_TABLE = ?
    ORDER BY TRIGGER_NAME";

/// One row of the indexes query: index name, unique, column.
pub type IndexColumn = (String, bool, String);

/// Build the [`Table`] for `schema`.`table` from the server catalog.
pub async fn load_table(conn: &mut Conn, schema: &str, table: &str) -> Result<Table, CatalogError> {
    let rows: Vec<Row> = conn.exec(COLUMNS_QUERY, (schema, table)).await?;
    let columns = rows
        .iter()
        .map(column_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    let rows: Vec<Row> = conn.exec(FOREIGN_KEYS_QUERY, (schema, table)).await?;
    let foreign_keys = rows
        .iter()
        .map(|row| {
            Ok((
                text(row, 0, "COLUMN_NAME")?,
                ForeignKeyRef::new(
                    text(row, 1, "REFERENCED_TABLE_SCHEMA")?,
                    text(row, 2, "REFERENCED_TABLE_NAME")?,
                    text(row, 3, "REFERENCED_COLUMN_NAME")?,
                ),
            ))
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    let rows: Vec<Row> = conn.exec(INDEXES_QUERY, (schema, table)).await?;
    let index_columns = rows
        .iter()
        .map(|row| {
            Ok((
                text(row, 0, "INDEX_NAME")?,
                number(row, 1).ok_or(CatalogError::InvalidRow("NON_UNIQUE"))? == 0,
                text(row, 2, "COLUMN_NAME")?,
            ))
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    let rows: Vec<Row> = conn.exec(TRIGGERS_QUERY, (schema, table)).await?;
    let triggers = rows
        .iter()
        .map(|row| {
            Ok(Trigger {
                name: text(row, 0, "TRIGGER_NAME")?,
                timing: text(row, 1, "ACTION_TIMING")?,
                event: text(row, 2, "EVENT_MANIPULATION")?,
                statement: text(row, 3, "ACTION_STATEMENT")?,
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    let table = assemble_table(schema, table, &columns, foreign_keys, index_columns, triggers)?;
    debug!(
        "Loaded {}.{}: {} columns, {} indexes, {} triggers",
        table.schema,
        table.name,
        table.columns.len(),
        table.indexes.len(),
        table.triggers.len()
    );
    Ok(table)
}

/// Combine the catalog query results into a [`Table`].
pub fn assemble_table(
    schema: &str,
    table: &str,
    columns: &[InformationSchemaColumn],
    foreign_keys: Vec<(String, ForeignKeyRef)>,
    index_columns: Vec<IndexColumn>,
    triggers: Vec<Trigger>,
) -> Result<Table, CatalogError> {
    if columns.is_empty() {
        return Err(CatalogError::TableNotFound {
            schema: schema.to_string(),
            table: table.to_string(),
        });
    }

    let mut descriptors: Vec<_> = columns.iter().map(|c| c.to_descriptor()).collect();
    for (column, reference) in foreign_keys {
        if let Some(descriptor) = descriptors.iter_mut().find(|d| d.name == column) {
            descriptor.foreign_key = Some(reference);
        }
    }

    let mut indexes: Vec<Index> = Vec::new();
    for (name, unique, column) in index_columns {
        match indexes.last_mut() {
            Some(index) if index.name == name => index.columns.push(column),
            _ => indexes.push(Index {
                name,
                unique,
                columns: vec![column],
            }),
        }
    }

    Ok(Table::new(schema, table, descriptors)
        .with_indexes(indexes)
        .with_triggers(triggers))
}

fn column_from_row(row: &Row) -> Result<InformationSchemaColumn, CatalogError> {
    Ok(InformationSchemaColumn {
        name: text(row, 0, "COLUMN_NAME")?,
        is_nullable: text(row, 1, "IS_NULLABLE")?,
        data_type: text(row, 2, "DATA_TYPE")?,
        column_type: text(row, 3, "COLUMN_TYPE")?,
        char_max_length: number(row, 4),
        numeric_precision: number(row, 5).and_then(|n| u32::try_from(n).ok()),
        numeric_scale: number(row, 6).and_then(|n| u32::try_from(n).ok()),
        column_key: text(row, 7, "COLUMN_KEY").unwrap_or_default(),
        extra: text(row, 8, "EXTRA").unwrap_or_default(),
    })
}

fn text(row: &Row, index: usize, field: &'static str) -> Result<String, CatalogError> {
    row.get_opt::<Option<String>, _>(index)
        .and_then(Result::ok)
        .flatten()
        .ok_or(CatalogError::InvalidRow(field))
}

fn number(row: &Row, index: usize) -> Option<u64> {
    row.get_opt::<Option<u64>, _>(index)
        .and_then(Result::ok)
        .flatten()
}
