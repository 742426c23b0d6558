//! Services Layer
//!
//! Presentation logic between a UI shell and the API client / watchlist.
//! Services turn provider data into render-ready view models and absorb
//! fetch failures so screens render with whatever data arrived.
//!
//! # Architecture
//!
//! ```text
//! UI shell --> Services ──┬──> MarketApi (Finnhub)
//!                         └──> WatchlistStore --> SQLite
//! ```
//!
//! # Services
//!
//! - `StockDetails` - Details screen: metrics/candles join plus news
//! - `WatchlistService` - Watchlist rows with price and daily change
//! - `NewsService` - Top stories and company news panels
//! - `SearchService` - Symbol search

pub mod details_service;
pub mod watchlist_service;
pub mod news_service;
pub mod search_service;
pub mod view_models;

// Re-export commonly used types and services
pub use details_service::{DetailsLoad, DetailsUpdate, StockDetails, WatchlistAlert};
pub use watchlist_service::{ChangeDirection, WatchlistRow, WatchlistService};
pub use news_service::NewsService;
pub use search_service::SearchService;
pub use view_models::{
    ChartViewModel, HeaderViewModel, MetricViewModel, NewsHeaderViewModel, NewsStoryViewModel,
};
