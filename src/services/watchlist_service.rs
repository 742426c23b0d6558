//! Watchlist Service
//!
//! Fetches a week of candles for every watched symbol in parallel, joins
//! them on one [`FetchGroup`], then builds the list rows.

use crate::api::types::CandleStick;
use crate::api::{MarketApi, DEFAULT_DAYS_BACK};
use crate::error::Result;
use crate::fetch_group::FetchGroup;
use crate::services::view_models::{format_percent, format_price, ChartViewModel};
use crate::watchlist::{WatchlistEntry, WatchlistStore};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Price movement since the prior session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeDirection {
    Up,
    Down,
}

/// One watchlist row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistRow {
    pub symbol: String,
    pub company_name: String,
    pub price: String,
    pub change_percentage: String,
    pub direction: ChangeDirection,
    pub chart: ChartViewModel,
    /// Raw candles, newest first, for opening the details screen
    #[serde(skip)]
    pub candles: Vec<CandleStick>,
}

/// `1 - prior_close / latest_close`, where prior is the newest candle from
/// an earlier calendar day than the latest one
pub fn change_fraction(candles: &[CandleStick]) -> f64 {
    let Some(latest) = candles.first() else {
        return 0.0;
    };
    let latest_day = latest.date.date_naive();

    match candles.iter().find(|c| c.date.date_naive() != latest_day) {
        Some(prior) if latest.close != 0.0 => 1.0 - prior.close / latest.close,
        _ => 0.0,
    }
}

/// Build a row from candles (newest first)
pub fn build_row(entry: &WatchlistEntry, candles: Vec<CandleStick>) -> WatchlistRow {
    let change = change_fraction(&candles);
    let price = candles.first().map(|c| c.close).unwrap_or(0.0);

    WatchlistRow {
        symbol: entry.symbol.clone(),
        company_name: entry.company_name.clone(),
        price: format_price(price),
        change_percentage: format_percent(change),
        direction: if change < 0.0 {
            ChangeDirection::Down
        } else {
            ChangeDirection::Up
        },
        chart: ChartViewModel {
            data: candles.iter().rev().map(|c| c.close).collect(),
            show_legend: false,
            show_axis: false,
        },
        candles,
    }
}

/// Watchlist overview service for business logic
pub struct WatchlistService;

impl WatchlistService {
    /// Load rows for the whole watchlist, in watchlist order
    pub async fn load(
        api: Arc<dyn MarketApi>,
        watchlist: &WatchlistStore,
    ) -> Result<Vec<WatchlistRow>> {
        let entries = watchlist.entries()?;
        info!("WatchlistService::load - {} symbols", entries.len());

        let group = FetchGroup::new();
        let fetched: Arc<Mutex<HashMap<String, Vec<CandleStick>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        for entry in &entries {
            let ticket = group.enter();
            let api = api.clone();
            let fetched = fetched.clone();
            let symbol = entry.symbol.clone();

            tokio::spawn(async move {
                let _ticket = ticket;
                match api.market_data(&symbol, DEFAULT_DAYS_BACK).await {
                    Ok(response) => {
                        fetched.lock().insert(symbol, response.candle_sticks());
                    }
                    Err(e) => warn!("Failed to fetch candles for {}: [{}] {}", symbol, e.code(), e),
                }
            });
        }

        group.wait().await;

        let fetched = fetched.lock();
        let rows = entries
            .iter()
            .map(|entry| {
                let candles = fetched.get(&entry.symbol).cloned().unwrap_or_default();
                build_row(entry, candles)
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{sample_market_data, FakeMarketApi};
    use crate::db::sqlite::SqliteDb;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn candle(day: u32, hour: u32, close: f64) -> CandleStick {
        CandleStick {
            date: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
        }
    }

    fn entry() -> WatchlistEntry {
        WatchlistEntry {
            symbol: "AAPL".to_string(),
            company_name: "Apple Inc.".to_string(),
        }
    }

    #[test]
    fn test_change_uses_prior_day() {
        // Newest first; two candles on the 5th, prior day closes at 100
        let candles = vec![candle(5, 16, 110.0), candle(5, 15, 108.0), candle(4, 16, 100.0)];
        let change = change_fraction(&candles);
        assert!((change - (1.0 - 100.0 / 110.0)).abs() < 1e-9);
    }

    #[test]
    fn test_change_without_prior_day_is_zero() {
        assert_eq!(change_fraction(&[]), 0.0);
        assert_eq!(change_fraction(&[candle(5, 16, 110.0), candle(5, 15, 90.0)]), 0.0);
    }

    #[test]
    fn test_build_row() {
        let row = build_row(&entry(), vec![candle(5, 16, 90.0), candle(4, 16, 100.0)]);
        assert_eq!(row.price, "$90.00");
        assert_eq!(row.direction, ChangeDirection::Down);
        assert!(row.change_percentage.starts_with('-'));
        assert_eq!(row.chart.data, vec![100.0, 90.0]);
    }

    #[test]
    fn test_build_row_without_data() {
        let row = build_row(&entry(), vec![]);
        assert_eq!(row.price, "$0.00");
        assert_eq!(row.change_percentage, "0.00%");
        assert_eq!(row.direction, ChangeDirection::Up);
    }

    #[tokio::test]
    async fn test_load_joins_every_symbol() {
        let store = WatchlistStore::new(Arc::new(SqliteDb::open_in_memory().unwrap()));
        let api = Arc::new(FakeMarketApi {
            candles: Some(sample_market_data(&[(1_709_596_800, 100.0), (1_709_683_200, 105.0)])),
            delay: Duration::from_millis(5),
            ..Default::default()
        });

        let rows = WatchlistService::load(api.clone(), &store).await.unwrap();

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].symbol, "AAPL");
        assert_eq!(rows[0].company_name, "Apple Inc.");
        assert!(rows.iter().all(|r| r.price == "$105.00"));
        assert_eq!(api.market_data_calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_load_survives_failures() {
        let store = WatchlistStore::new(Arc::new(SqliteDb::open_in_memory().unwrap()));
        let api = Arc::new(FakeMarketApi::default());

        let rows = WatchlistService::load(api, &store).await.unwrap();
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r.chart.data.is_empty()));
    }
}
