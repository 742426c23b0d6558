//! Key-value preferences
//!
//! Values are stored as JSON text so strings, string lists and flags keep
//! their type across restarts.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read and decode a value
pub fn get_value<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM preferences WHERE key = ?",
            [key],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and upsert a value
pub fn set_value<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        [key, raw.as_str()],
    )?;
    Ok(())
}

/// Delete a value; returns whether it existed
pub fn remove_value(conn: &Connection, key: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM preferences WHERE key = ?", [key])?;
    Ok(rows > 0)
}
