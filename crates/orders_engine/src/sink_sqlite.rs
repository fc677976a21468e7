use std::path::Path;

use rusqlite::types::{ToSql, ToSqlOutput, Value};
use rusqlite::Connection;

use crate::persist::ensure_parent_dir;
use crate::types::{Cell, ColumnType, NormalizedTable, SinkLocation, WriteError};

/// Name of the table holding the scraped dataset.
pub const ORDERS_TABLE: &str = "orders";

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Null => ToSqlOutput::Owned(Value::Null),
            Cell::Int(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            Cell::Float(v) => ToSqlOutput::Owned(Value::Real(*v)),
            Cell::Text(v) => ToSqlOutput::Borrowed(v.as_str().into()),
        })
    }
}

/// Replace the `orders` table in the database at `path` with the given
/// table. Column SQL types are inferred from the normalized cells, and the
/// whole write happens inside one transaction: either the new table with all
/// rows lands, or the database is left as it was.
pub fn write_sqlite(table: &NormalizedTable, path: &Path) -> Result<SinkLocation, WriteError> {
    ensure_parent_dir(path)?;

    let mut conn = Connection::open(path)?;
    let tx = conn.transaction()?;

    let columns = table
        .headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            format!(
                "{} {}",
                quote_identifier(header),
                sql_type(table.column_type(index))
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};\nCREATE TABLE {table} ({columns});",
        table = quote_identifier(ORDERS_TABLE),
    ))?;

    if !table.rows.is_empty() {
        let placeholders = vec!["?"; table.column_count()].join(", ");
        let insert_sql = format!(
            "INSERT INTO {} VALUES ({placeholders})",
            quote_identifier(ORDERS_TABLE)
        );
        let mut stmt = tx.prepare(&insert_sql)?;
        for row in &table.rows {
            stmt.execute(rusqlite::params_from_iter(row.iter()))?;
        }
    }

    tx.commit()?;
    Ok(SinkLocation::Database {
        path: path.to_path_buf(),
        table: ORDERS_TABLE.to_string(),
    })
}

fn sql_type(column: ColumnType) -> &'static str {
    match column {
        ColumnType::Integer => "INTEGER",
        ColumnType::Real => "REAL",
        ColumnType::Text => "TEXT",
    }
}

/// Double-quote an identifier, escaping embedded quotes. Header names come
/// from scraped markup and cannot be trusted to be bare words.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_identifier;

    #[test]
    fn identifiers_are_quoted_and_escaped() {
        assert_eq!(quote_identifier("Order #"), "\"Order #\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
