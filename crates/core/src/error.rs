//! Error types for the ingestion pipeline
//!
//! One error enum is shared by the core pipeline, the store layer, and the
//! server. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations. Store failures carry their message as a string so this
//! crate stays free of driver types.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the ingestion pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// The raw input could not be parsed as JSON. Reported to the caller as
    /// a client error; no store I/O is attempted.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A store round trip failed (connection, statement, or schema change)
    /// for a reason other than a benign schema race. Surfaced to the caller
    /// as a server error; the write is not retried.
    #[error("store error: {0}")]
    Store(String),

    /// Configuration could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedDocument(e.to_string())
    }
}
