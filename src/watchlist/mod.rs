//! Persisted watchlist
//!
//! The list of symbols lives under one key and each company name under its
//! own `name:<SYMBOL>` key, so the two records can drift apart; readers fall
//! back to the symbol when a name is missing.

use crate::db::sqlite::SqliteDb;
use crate::error::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

const WATCHLIST_KEY: &str = "watchlist";
const ONBOARDED_KEY: &str = "hasOnboarded";
const NAME_KEY_PREFIX: &str = "name:";
const EVENT_CAPACITY: usize = 64;

/// Preference key holding a symbol's company name
pub fn name_key(symbol: &str) -> String {
    format!("{}{}", NAME_KEY_PREFIX, symbol)
}

/// Symbols seeded on first launch
pub const DEFAULT_WATCHLIST: [(&str, &str); 10] = [
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("SNAP", "Snap Inc."),
    ("GOOG", "Alphabet"),
    ("AMZN", "Amazon.com, Inc."),
    ("WORK", "Slack Technologies"),
    ("FB", "Facebook Inc."),
    ("NVDA", "Nvidia Inc."),
    ("NKE", "Nike"),
    ("PINS", "Pinterest"),
];

/// Symbol with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub company_name: String,
}

/// Change notification for subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchlistEvent {
    Added { symbol: String, company_name: String },
    Removed { symbol: String },
}

/// Watchlist backed by the preferences database
pub struct WatchlistStore {
    db: Arc<SqliteDb>,
    events: broadcast::Sender<WatchlistEvent>,
    // Serialises read-modify-write cycles on the list
    write_lock: Mutex<()>,
}

impl WatchlistStore {
    pub fn new(db: Arc<SqliteDb>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            db,
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// Subscribe to add/remove notifications
    pub fn subscribe(&self) -> broadcast::Receiver<WatchlistEvent> {
        self.events.subscribe()
    }

    /// Symbols in stored order, seeding the defaults on first access
    pub fn watchlist(&self) -> Result<Vec<String>> {
        self.ensure_seeded()?;
        Ok(self.db.string_array(WATCHLIST_KEY)?.unwrap_or_default())
    }

    /// Whether the symbol is on the watchlist
    pub fn contains(&self, symbol: &str) -> Result<bool> {
        Ok(self.watchlist()?.iter().any(|s| s == symbol))
    }

    /// Stored company name for a symbol
    pub fn company_name(&self, symbol: &str) -> Result<Option<String>> {
        self.db.string(&name_key(symbol))
    }

    /// Symbols paired with their names
    pub fn entries(&self) -> Result<Vec<WatchlistEntry>> {
        self.watchlist()?
            .into_iter()
            .map(|symbol| {
                let company_name = self.company_name(&symbol)?.unwrap_or_else(|| symbol.clone());
                Ok(WatchlistEntry {
                    symbol,
                    company_name,
                })
            })
            .collect()
    }

    /// Append a symbol (duplicates are kept) and record its name
    pub fn add(&self, symbol: &str, company_name: &str) -> Result<()> {
        self.ensure_seeded()?;
        {
            let _guard = self.write_lock.lock();
            let mut current = self.db.string_array(WATCHLIST_KEY)?.unwrap_or_default();
            current.push(symbol.to_string());
            self.db.set_value(WATCHLIST_KEY, &current)?;
            self.db.set_value(&name_key(symbol), company_name)?;
        }

        info!("Added {} ({}) to watchlist", symbol, company_name);
        self.emit(WatchlistEvent::Added {
            symbol: symbol.to_string(),
            company_name: company_name.to_string(),
        });
        Ok(())
    }

    /// Drop every occurrence of a symbol and its name
    pub fn remove(&self, symbol: &str) -> Result<()> {
        self.ensure_seeded()?;
        {
            let _guard = self.write_lock.lock();
            let current = self.db.string_array(WATCHLIST_KEY)?.unwrap_or_default();
            let remaining: Vec<String> = current.into_iter().filter(|s| s != symbol).collect();

            self.db.remove_value(&name_key(symbol))?;
            self.db.set_value(WATCHLIST_KEY, &remaining)?;
        }

        info!("Removed {} from watchlist", symbol);
        self.emit(WatchlistEvent::Removed {
            symbol: symbol.to_string(),
        });
        Ok(())
    }

    fn ensure_seeded(&self) -> Result<()> {
        if self.db.bool(ONBOARDED_KEY)? {
            return Ok(());
        }

        let _guard = self.write_lock.lock();
        // Another caller may have seeded while we waited
        if !self.db.bool(ONBOARDED_KEY)? {
            self.db.set_value(ONBOARDED_KEY, &true)?;
            self.seed_defaults()?;
        }
        Ok(())
    }

    fn seed_defaults(&self) -> Result<()> {
        let symbols: Vec<&str> = DEFAULT_WATCHLIST.iter().map(|(symbol, _)| *symbol).collect();
        self.db.set_value(WATCHLIST_KEY, &symbols)?;

        for (symbol, name) in DEFAULT_WATCHLIST {
            self.db.set_value(&name_key(symbol), name)?;
        }

        info!("Seeded default watchlist with {} symbols", symbols.len());
        Ok(())
    }

    fn emit(&self, event: WatchlistEvent) {
        // No receivers is fine
        if self.events.send(event).is_err() {
            debug!("No watchlist subscribers");
        }
    }
}
