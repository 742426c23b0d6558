//! Stock Details Service
//!
//! Drives the details screen for one symbol. Two fetches start together:
//!
//! - financial data: metrics, plus candles when none were handed in. Both
//!   join one [`FetchGroup`] and the header renders once it drains.
//! - company news: applied on its own whenever it resolves.
//!
//! Failures are logged and the screen renders with what it has. Results
//! reach the UI as [`DetailsUpdate`] messages on a channel the UI context
//! drains, so view state is only touched from that context.

use crate::api::types::{CandleStick, Metrics, NewsStory};
use crate::api::{MarketApi, NewsScope, DEFAULT_DAYS_BACK};
use crate::error::Result;
use crate::fetch_group::FetchGroup;
use crate::services::view_models::*;
use crate::watchlist::WatchlistStore;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// Message for the UI context
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsUpdate {
    /// Chart and metrics are ready
    Header(HeaderViewModel),
    /// The news list changed
    Stories(Vec<NewsStoryViewModel>),
}

/// Confirmation shown after adding to the watchlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistAlert {
    pub title: String,
    pub message: String,
}

/// Handles for the fetches started by [`StockDetails::load`]
pub struct DetailsLoad {
    pub header: JoinHandle<()>,
    pub news: JoinHandle<()>,
}

/// Details presenter for one symbol
pub struct StockDetails {
    symbol: String,
    company_name: String,
    api: Arc<dyn MarketApi>,
    watchlist: Arc<WatchlistStore>,
    candles: RwLock<Vec<CandleStick>>,
    metrics: RwLock<Option<Metrics>>,
    stories: RwLock<Vec<NewsStory>>,
    ui: mpsc::UnboundedSender<DetailsUpdate>,
}

impl StockDetails {
    /// Create the presenter and the receiving end of its UI channel
    pub fn new(
        symbol: impl Into<String>,
        company_name: impl Into<String>,
        candles: Vec<CandleStick>,
        api: Arc<dyn MarketApi>,
        watchlist: Arc<WatchlistStore>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<DetailsUpdate>) {
        let (ui, updates) = mpsc::unbounded_channel();
        let details = Arc::new(Self {
            symbol: symbol.into(),
            company_name: company_name.into(),
            api,
            watchlist,
            candles: RwLock::new(candles),
            metrics: RwLock::new(None),
            stories: RwLock::new(Vec::new()),
            ui,
        });
        (details, updates)
    }

    /// Screen title
    pub fn title(&self) -> &str {
        &self.company_name
    }

    /// Start both fetches
    pub fn load(self: &Arc<Self>) -> DetailsLoad {
        info!("StockDetails::load - {}", self.symbol);
        DetailsLoad {
            header: self.fetch_financial_data(),
            news: self.fetch_news(),
        }
    }

    fn fetch_financial_data(self: &Arc<Self>) -> JoinHandle<()> {
        let group = FetchGroup::new();

        // Candles only when the caller did not hand any in
        if self.candles.read().is_empty() {
            let ticket = group.enter();
            let api = self.api.clone();
            let symbol = self.symbol.clone();
            let this = Arc::downgrade(self);

            tokio::spawn(async move {
                let _ticket = ticket;
                match api.market_data(&symbol, DEFAULT_DAYS_BACK).await {
                    Ok(response) => {
                        if let Some(this) = this.upgrade() {
                            *this.candles.write() = response.candle_sticks();
                        }
                    }
                    Err(e) => warn!("Failed to fetch candles for {}: [{}] {}", symbol, e.code(), e),
                }
            });
        }

        let ticket = group.enter();
        let api = self.api.clone();
        let symbol = self.symbol.clone();
        let this = Arc::downgrade(self);

        tokio::spawn(async move {
            let _ticket = ticket;
            match api.financial_metrics(&symbol).await {
                Ok(response) => {
                    if let Some(this) = this.upgrade() {
                        *this.metrics.write() = Some(response.metric);
                    }
                }
                Err(e) => warn!("Failed to fetch metrics for {}: [{}] {}", symbol, e.code(), e),
            }
        });

        let this: Weak<Self> = Arc::downgrade(self);
        group.notify(move || {
            if let Some(this) = this.upgrade() {
                this.render_header();
            }
        })
    }

    fn fetch_news(self: &Arc<Self>) -> JoinHandle<()> {
        let api = self.api.clone();
        let symbol = self.symbol.clone();
        let this = Arc::downgrade(self);

        tokio::spawn(async move {
            match api.news(NewsScope::Company(symbol.clone())).await {
                Ok(stories) => {
                    let Some(this) = this.upgrade() else {
                        return;
                    };
                    debug!("Loaded {} stories for {}", stories.len(), symbol);
                    let rows = stories.iter().map(NewsStoryViewModel::from).collect();
                    *this.stories.write() = stories;
                    this.send(DetailsUpdate::Stories(rows));
                }
                Err(e) => warn!("Failed to fetch news for {}: [{}] {}", symbol, e.code(), e),
            }
        })
    }

    /// Build the header from current candles and metrics and push it to the UI
    fn render_header(&self) {
        let data = self.candles.read().iter().rev().map(|c| c.close).collect();
        let metrics = metric_view_models(self.metrics.read().as_ref());

        let header = HeaderViewModel {
            chart: ChartViewModel {
                data,
                show_legend: true,
                show_axis: true,
            },
            metrics,
        };

        self.send(DetailsUpdate::Header(header));
    }

    fn send(&self, update: DetailsUpdate) {
        if self.ui.send(update).is_err() {
            debug!("Details view for {} is gone; dropping update", self.symbol);
        }
    }

    /// Last fetched metrics
    pub fn metrics(&self) -> Option<Metrics> {
        self.metrics.read().clone()
    }

    /// Current candles, newest first
    pub fn candles(&self) -> Vec<CandleStick> {
        self.candles.read().clone()
    }

    pub fn story_count(&self) -> usize {
        self.stories.read().len()
    }

    /// Row model for a list index
    pub fn row(&self, index: usize) -> Option<NewsStoryViewModel> {
        self.stories.read().get(index).map(NewsStoryViewModel::from)
    }

    /// Section header; the add button hides once the symbol is watched
    pub fn news_header(&self) -> Result<NewsHeaderViewModel> {
        Ok(NewsHeaderViewModel {
            title: self.symbol.to_uppercase(),
            show_add_button: !self.watchlist.contains(&self.symbol)?,
        })
    }

    /// Link to open for a tapped row
    pub fn select_story(&self, index: usize) -> Option<Url> {
        let stories = self.stories.read();
        let story = stories.get(index)?;
        match Url::parse(&story.url) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Story {} has an unusable URL '{}': {}", index, story.url, e);
                None
            }
        }
    }

    /// Add this symbol to the watchlist
    pub fn add_to_watchlist(&self) -> Result<WatchlistAlert> {
        self.watchlist.add(&self.symbol, &self.company_name)?;
        Ok(WatchlistAlert {
            title: "Added to Watchlist".to_string(),
            message: format!("We've added {} to your watchlist.", self.company_name),
        })
    }
}
