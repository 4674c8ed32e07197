//! Row writer
//!
//! Runs the whole pipeline for one document: bootstrap the table, flatten,
//! reconcile the schema, then append one row holding the raw payload plus
//! every attribute value.
//!
//! The insert is a single parameterized statement. Every value is bound,
//! never spliced into the SQL text, and null attributes are bound as SQL
//! NULL rather than the string "null".
//!
//! Attribute names are exact-unique within a document, but the table matches
//! column identifiers case-insensitively, and one statement cannot mention
//! the same column twice. Before binding, the writer therefore resolves the
//! attribute names against the statement's identifier space: a name that
//! case-insensitively duplicates `Id`, `Payload`, or an earlier attribute is
//! suffixed `_2`, `_3`, … so every value keeps its own column.

use crate::schema::ensure_columns;
use crate::table::ensure_table;
use crate::{quote_identifier, store_err, ID_COLUMN, PAYLOAD_COLUMN};
use magellan_core::{flatten, AttributeSet, Error, Result};
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Flatten `document` and append it to `table` as one row.
///
/// The new row's identity is assigned by the store and not returned. The
/// write is attempted exactly once; schema growth that happened before a
/// failed insert stays in place (harmless, the columns are nullable and
/// idempotent to re-add).
pub fn write_document(conn: &Connection, table: &str, document: &Value) -> Result<()> {
    ensure_table(conn, table)?;

    let attributes = flatten(document);
    let columns = resolve_insert_columns(&attributes);
    ensure_columns(conn, table, columns.iter().map(|(name, _)| name.as_str()))?;

    let payload = serde_json::to_string(document)?;
    insert_row(conn, table, &payload, &columns)
}

/// Resolve attribute names into the distinct column identifiers the insert
/// statement will use, pairing each with its value.
///
/// `Id` and `Payload` are reserved from the start, so a document key named
/// `payload` lands in `payload_2` instead of colliding with the raw
/// document, and nothing can ever write the identity column.
fn resolve_insert_columns(attributes: &AttributeSet) -> Vec<(String, Option<String>)> {
    let mut taken: HashSet<String> =
        [ID_COLUMN, PAYLOAD_COLUMN].iter().map(|c| c.to_lowercase()).collect();

    let mut columns = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        let mut name = attribute.name.clone();
        if taken.contains(&name.to_lowercase()) {
            let mut n = 2u64;
            name = loop {
                let suffixed = format!("{}_{}", attribute.name, n);
                if !taken.contains(&suffixed.to_lowercase()) {
                    break suffixed;
                }
                n += 1;
            };
        }
        taken.insert(name.to_lowercase());
        columns.push((name, attribute.value.clone()));
    }
    columns
}

/// Execute the single-statement insert: payload first, then every attribute.
fn insert_row(
    conn: &Connection,
    table: &str,
    payload: &str,
    columns: &[(String, Option<String>)],
) -> Result<()> {
    let mut identifiers = vec![quote_identifier(PAYLOAD_COLUMN)];
    identifiers.extend(columns.iter().map(|(name, _)| quote_identifier(name)));

    let placeholders: Vec<String> = (1..=identifiers.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        identifiers.join(", "),
        placeholders.join(", "),
    );

    let mut values: Vec<Option<&str>> = vec![Some(payload)];
    values.extend(columns.iter().map(|(_, value)| value.as_deref()));

    let changed = conn
        .execute(&sql, params_from_iter(values))
        .map_err(store_err)?;
    if changed != 1 {
        return Err(Error::Store(format!(
            "insert affected {} rows, expected 1",
            changed
        )));
    }

    debug!(table = %table, attributes = columns.len(), "stored document");
    Ok(())
}
