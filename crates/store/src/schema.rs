//! Schema reconciliation
//!
//! Grows the destination table's column set to cover a document's attribute
//! names. Column identity is case-insensitive; the live column list is
//! re-read on every call rather than cached, since concurrent writers may
//! have grown the schema in the meantime.
//!
//! Multiple in-flight requests may reconcile overlapping column sets at
//! once. No lock guards the schema: add-column is treated as idempotent, and
//! the duplicate-column error from a lost race counts as already-satisfied.

use crate::{quote_identifier, store_err};
use magellan_core::Result;
use rusqlite::Connection;
use std::collections::HashSet;
use tracing::debug;

/// List the table's current column names, in table order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let sql = format!("PRAGMA table_info({})", quote_identifier(table));
    let mut stmt = conn.prepare(&sql).map_err(store_err)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(store_err)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(store_err)
}

/// Ensure every desired column exists, adding missing ones as nullable
/// unbounded text.
///
/// The desired set is deduplicated case-insensitively before iterating, so a
/// document that produced two case-variants of the same name yields one
/// column request. Existing columns are never altered or removed.
pub fn ensure_columns<'a, I>(conn: &Connection, table: &str, desired: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let existing: HashSet<String> = table_columns(conn, table)?
        .iter()
        .map(|name| name.to_lowercase())
        .collect();

    let mut requested: HashSet<String> = HashSet::new();
    for name in desired {
        let folded = name.to_lowercase();
        if existing.contains(&folded) || !requested.insert(folded) {
            continue;
        }
        add_column(conn, table, name)?;
    }
    Ok(())
}

/// Add one nullable text column, absorbing the duplicate-column error a lost
/// race produces.
fn add_column(conn: &Connection, table: &str, name: &str) -> Result<()> {
    let sql = format!(
        "ALTER TABLE {} ADD COLUMN {} TEXT",
        quote_identifier(table),
        quote_identifier(name),
    );
    match conn.execute_batch(&sql) {
        Ok(()) => {
            debug!(table = %table, column = %name, "added column");
            Ok(())
        }
        Err(err) if is_duplicate_column(&err) => Ok(()),
        Err(err) => Err(store_err(err)),
    }
}

/// True for the error SQLite reports when the column already exists.
fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("duplicate column name")
    )
}
