use log::debug;
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, Transaction, params, params_from_iter};

use crate::domain::parser::{self, Row};
use crate::errors::HandicapResult;

use super::connection::DbConn;
use super::schema::{Column, ColumnType, EntityKind};

/// Replaces the whole content of `kind`'s table with `rows` (header first).
///
/// The table is created on first sight. Create-or-clear and the inserts run in
/// one transaction, so a failure keeps the previous snapshot. Returns the
/// number of data rows inserted.
pub fn replace(conn: &mut DbConn, kind: EntityKind, rows: &[Row]) -> HandicapResult<usize> {
    let tx = conn.transaction()?;

    if table_exists(&tx, kind)? {
        clear_table(&tx, kind)?;
    } else {
        create_table(&tx, kind)?;
    }

    let inserted = insert_rows(&tx, kind, data_rows(rows))?;
    tx.commit()?;

    debug!("Replaced {} with {} rows", kind.table_name(), inserted);
    Ok(inserted)
}

pub fn table_exists(conn: &rusqlite::Connection, kind: EntityKind) -> HandicapResult<bool> {
    let sql = "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1";
    let found: Option<String> = conn
        .query_row(sql, params![kind.table_name()], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn data_rows(rows: &[Row]) -> &[Row] {
    rows.get(1..).unwrap_or(&[])
}

fn create_table(tx: &Transaction, kind: EntityKind) -> HandicapResult<()> {
    tx.execute(&kind.create_table_sql(), [])?;
    Ok(())
}

fn clear_table(tx: &Transaction, kind: EntityKind) -> HandicapResult<()> {
    tx.execute(&format!("DELETE FROM {}", kind.table_name()), [])?;
    Ok(())
}

fn insert_rows(tx: &Transaction, kind: EntityKind, rows: &[Row]) -> HandicapResult<usize> {
    let mut stmt = tx.prepare(&kind.insert_sql())?;
    let columns = kind.columns();

    for row in rows {
        let values = row
            .iter()
            .zip(columns)
            .map(|(cell, column)| to_value(cell, column));
        stmt.execute(params_from_iter(values))?;
    }

    Ok(rows.len())
}

fn to_value(cell: &str, column: &Column) -> Value {
    match column.kind {
        ColumnType::Text => Value::Text(cell.to_string()),
        ColumnType::Integer => parser::parse_integer(cell).map_or(Value::Null, Value::Integer),
        ColumnType::Real => parser::parse_real(cell).map_or(Value::Null, Value::Real),
    }
}
