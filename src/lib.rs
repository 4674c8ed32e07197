//! Magellan - schema-evolving JSON ingestion service
//!
//! Magellan receives arbitrary JSON documents and durably stores each one in
//! a relational table whose schema grows automatically to accommodate new
//! fields. Documents are flattened into path-named attributes, missing
//! columns are added on demand, and the raw payload plus its attributes land
//! as a single row.
//!
//! # Quick Start
//!
//! ```ignore
//! use magellan::{connection, write_document, DEFAULT_TABLE};
//!
//! let conn = connection::open("magellan.db".as_ref())?;
//! let doc = serde_json::json!({"a": 1, "b": {"c": "x"}});
//! write_document(&conn, DEFAULT_TABLE, &doc)?;
//! ```
//!
//! # Architecture
//!
//! The pure pipeline pieces (flattening, column naming) live in
//! [`magellan_core`]; everything that touches the store (table bootstrap,
//! schema reconciliation, row insert) lives in [`magellan_store`]. The HTTP
//! ingress layer is a separate crate, `magellan-server`, wired up by the
//! `magelland` binary.

// Re-export the public pipeline API
pub use magellan_core::{column_name, flatten, Attribute, AttributeSet, Error, Result};
pub use magellan_store::{
    connection, ensure_columns, ensure_table, table_columns, write_document, DEFAULT_TABLE,
    ID_COLUMN, PAYLOAD_COLUMN,
};

// The HTTP ingress layer, re-exported for embedding in another runtime
pub use magellan_server as server;
