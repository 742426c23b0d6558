//! SQLite database module

mod connection;
mod migrations;
mod preferences;

use crate::error::Result;
use parking_lot::Mutex;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// SQLite database wrapper
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Open the database file, creating its directory if needed
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = connection::create_connection(path)?;
        tracing::info!("Opened preferences database at {:?}", path);
        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };

        // Run migrations
        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    // ========== Preference Methods ==========

    /// Get a decoded preference value
    pub fn get_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let conn = self.conn.lock();
        preferences::get_value(&conn, key)
    }

    /// Store a preference value
    pub fn set_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let conn = self.conn.lock();
        preferences::set_value(&conn, key, value)
    }

    /// Delete a preference value
    pub fn remove_value(&self, key: &str) -> Result<bool> {
        let conn = self.conn.lock();
        preferences::remove_value(&conn, key)
    }

    /// Get a string preference
    pub fn string(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key)
    }

    /// Get a string list preference
    pub fn string_array(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.get_value(key)
    }

    /// Get a flag; missing reads as `false`
    pub fn bool(&self, key: &str) -> Result<bool> {
        Ok(self.get_value::<bool>(key)?.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.db");

        {
            let db = SqliteDb::new(&path).unwrap();
            db.set_value("watchlist", &["AAPL", "MSFT"]).unwrap();
            db.set_value("hasOnboarded", &true).unwrap();
        }

        let db = SqliteDb::new(&path).unwrap();
        assert_eq!(
            db.string_array("watchlist").unwrap(),
            Some(vec!["AAPL".to_string(), "MSFT".to_string()])
        );
        assert!(db.bool("hasOnboarded").unwrap());
    }

    #[test]
    fn test_missing_flag_is_false() {
        let db = SqliteDb::open_in_memory().unwrap();
        assert!(!db.bool("hasOnboarded").unwrap());
        assert!(db.string("AAPL").unwrap().is_none());
    }
}
