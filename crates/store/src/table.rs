//! Destination table bootstrap
//!
//! The table is created lazily on first use and never dropped by this layer.
//! Creation is idempotent and safe under concurrent first use: `IF NOT
//! EXISTS` turns the lost race into a no-op instead of an error.

use crate::{quote_identifier, store_err, ID_COLUMN, PAYLOAD_COLUMN};
use magellan_core::Result;
use rusqlite::Connection;

/// Ensure the destination table exists.
///
/// A fresh table carries exactly two columns: an auto-incrementing integer
/// primary key and the not-null payload text column. Dynamic columns are
/// added later by the schema reconciler.
pub fn ensure_table(conn: &Connection, table: &str) -> Result<()> {
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (
            {} INTEGER PRIMARY KEY AUTOINCREMENT,
            {} TEXT NOT NULL
        )",
        quote_identifier(table),
        quote_identifier(ID_COLUMN),
        quote_identifier(PAYLOAD_COLUMN),
    );
    conn.execute_batch(&sql).map_err(store_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::open_in_memory;
    use crate::schema::table_columns;
    use crate::DEFAULT_TABLE;

    #[test]
    fn creates_table_with_fixed_columns() {
        let conn = open_in_memory().unwrap();
        ensure_table(&conn, DEFAULT_TABLE).unwrap();
        let columns = table_columns(&conn, DEFAULT_TABLE).unwrap();
        assert_eq!(columns, vec![ID_COLUMN.to_string(), PAYLOAD_COLUMN.to_string()]);
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let conn = open_in_memory().unwrap();
        ensure_table(&conn, DEFAULT_TABLE).unwrap();
        ensure_table(&conn, DEFAULT_TABLE).unwrap();
        ensure_table(&conn, DEFAULT_TABLE).unwrap();
        let columns = table_columns(&conn, DEFAULT_TABLE).unwrap();
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn existing_dynamic_columns_survive_bootstrap() {
        let conn = open_in_memory().unwrap();
        ensure_table(&conn, DEFAULT_TABLE).unwrap();
        conn.execute_batch("ALTER TABLE \"mfMagellan\" ADD COLUMN \"a\" TEXT")
            .unwrap();
        ensure_table(&conn, DEFAULT_TABLE).unwrap();
        let columns = table_columns(&conn, DEFAULT_TABLE).unwrap();
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn table_name_with_odd_characters_is_quoted() {
        let conn = open_in_memory().unwrap();
        ensure_table(&conn, "my table").unwrap();
        let columns = table_columns(&conn, "my table").unwrap();
        assert_eq!(columns.len(), 2);
    }
}
