//! Application state management

use crate::api::types::CandleStick;
use crate::api::{FinnhubClient, MarketApi};
use crate::config::AppConfig;
use crate::db::sqlite::SqliteDb;
use crate::error::Result;
use crate::services::{DetailsUpdate, StockDetails};
use crate::watchlist::WatchlistStore;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Services shared across screens, built once at startup
pub struct AppState {
    /// Runtime configuration
    pub config: AppConfig,

    /// Preferences database
    pub sqlite: Arc<SqliteDb>,

    /// Market data provider
    pub api: Arc<dyn MarketApi>,

    /// Persisted watchlist
    pub watchlist: Arc<WatchlistStore>,
}

impl AppState {
    /// Create application state from configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("Data directory: {:?}", config.data_dir);

        let sqlite = Arc::new(SqliteDb::new(&config.database_path())?);
        let api: Arc<dyn MarketApi> = Arc::new(FinnhubClient::from_config(&config)?);

        Ok(Self::with_parts(config, sqlite, api))
    }

    /// Assemble state from already-built parts
    pub fn with_parts(config: AppConfig, sqlite: Arc<SqliteDb>, api: Arc<dyn MarketApi>) -> Self {
        let watchlist = Arc::new(WatchlistStore::new(sqlite.clone()));
        Self {
            config,
            sqlite,
            api,
            watchlist,
        }
    }

    /// Open the details presenter for a symbol
    pub fn stock_details(
        &self,
        symbol: &str,
        company_name: &str,
        candles: Vec<CandleStick>,
    ) -> (Arc<StockDetails>, mpsc::UnboundedReceiver<DetailsUpdate>) {
        StockDetails::new(
            symbol,
            company_name,
            candles,
            self.api.clone(),
            self.watchlist.clone(),
        )
    }
}
