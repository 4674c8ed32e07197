//! Core ingestion pipeline for Magellan
//!
//! This crate holds the pure, I/O-free pieces of the pipeline:
//! - [`flatten`]: convert one JSON document into an ordered set of
//!   column-name/value attributes
//! - [`column_name`]: derive a safe, bounded relational identifier from a
//!   JSON key path
//! - [`Error`]: the error type shared by the pipeline and the store layer
//!
//! Store I/O (table bootstrap, schema reconciliation, row insert) lives in
//! `magellan-store`.

pub mod column;
pub mod error;
pub mod flatten;

pub use column::{column_name, FALLBACK_COLUMN_NAME, MAX_COLUMN_NAME_LEN};
pub use error::{Error, Result};
pub use flatten::{flatten, Attribute, AttributeSet, ROOT_VALUE_COLUMN};
