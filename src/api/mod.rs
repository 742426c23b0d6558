//! Market data API module

pub mod types;
pub mod transport;
pub mod finnhub;

#[cfg(test)]
pub mod testing;

use crate::error::Result;
use async_trait::async_trait;
use types::*;

pub use finnhub::FinnhubClient;
pub use transport::{HttpTransport, ReqwestTransport};

/// Default candle lookback in days
pub const DEFAULT_DAYS_BACK: i64 = 7;

/// Which news feed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsScope {
    /// General market headlines
    TopStories,
    /// Headlines for one ticker over the last week
    Company(String),
}

/// Market data provider used by the presentation services
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// Search symbols by free text
    async fn search(&self, query: &str) -> Result<SearchResponse>;

    /// Get news for a scope
    async fn news(&self, scope: NewsScope) -> Result<Vec<NewsStory>>;

    /// Get intraday candles over the last `days_back` days, ending yesterday
    async fn market_data(&self, symbol: &str, days_back: i64) -> Result<MarketDataResponse>;

    /// Get headline financial metrics
    async fn financial_metrics(&self, symbol: &str) -> Result<FinancialMetricsResponse>;
}
