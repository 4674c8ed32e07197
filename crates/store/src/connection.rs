//! SQLite connection handling
//!
//! Connections are scoped to one request: opened at the start of a pipeline
//! run, dropped on every exit path. No pooling happens at this layer.
//!
//! WAL journaling keeps concurrent writers from blocking readers while a
//! schema change is in flight; the busy timeout bounds how long a writer
//! waits for the database lock instead of failing immediately.

use crate::store_err;
use magellan_core::Result;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

/// How long a connection waits on a locked database before giving up (ms)
pub const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Open a connection to the database file, creating it if absent.
pub fn open(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let conn = Connection::open_with_flags(path, flags).map_err(store_err)?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

/// Open an in-memory database. Each call returns a fresh, empty store.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(store_err)?;
    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))
        .map_err(store_err)?;
    Ok(conn)
}

fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")
        .map_err(store_err)?;
    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))
        .map_err(store_err)?;
    Ok(())
}
