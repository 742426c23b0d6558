//! SQLite connection utilities

use rusqlite::Connection;
use std::path::Path;

/// Open (creating if needed) a SQLite database file
pub fn create_connection(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

    Ok(conn)
}
