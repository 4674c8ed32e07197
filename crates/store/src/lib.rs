//! Store layer for Magellan
//!
//! Everything that talks to the relational store lives here:
//! - [`connection`]: open a SQLite connection with the pragmas the pipeline
//!   relies on
//! - [`ensure_table`]: create the destination table on first use
//! - [`ensure_columns`]: grow the schema to cover a document's attributes
//! - [`write_document`]: run the whole pipeline and insert one row
//!
//! The destination table always carries the fixed columns [`ID_COLUMN`] and
//! [`PAYLOAD_COLUMN`]; every dynamic column is nullable unbounded text. The
//! column set only grows, and growth is arbitrated by the store itself: a
//! lost add-column race is absorbed, never surfaced.

pub mod connection;
pub mod schema;
pub mod table;
pub mod writer;

pub use schema::{ensure_columns, table_columns};
pub use table::ensure_table;
pub use writer::write_document;

use magellan_core::Error;

/// Default destination table name
pub const DEFAULT_TABLE: &str = "mfMagellan";

/// System-generated primary key column, assigned by the store
pub const ID_COLUMN: &str = "Id";

/// Column holding the full raw document, always present and not null
pub const PAYLOAD_COLUMN: &str = "Payload";

/// Convert a driver error into the shared store error.
pub(crate) fn store_err(err: rusqlite::Error) -> Error {
    Error::Store(err.to_string())
}

/// Quote an identifier for splicing into SQL text.
///
/// Values are always bound as parameters; identifiers cannot be, so they are
/// double-quoted with embedded quotes doubled.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
