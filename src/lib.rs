//! Stockwatch - stock quotes, metrics and news with a local watchlist
//!
//! Headless core of the app: a typed Finnhub client, a SQLite-backed
//! watchlist and the presentation services a UI shell drives.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch_group;
pub mod services;
pub mod state;
pub mod watchlist;

use api::NewsScope;
use config::AppConfig;
use services::{DetailsUpdate, NewsService, WatchlistService};
use state::AppState;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use watchlist::WatchlistEvent;

/// Initialize logging, build state and walk the main screens once
pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockwatch_lib=debug,stockwatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stockwatch...");

    let config = AppConfig::from_env()?;
    let state = AppState::new(config)?;
    tracing::info!("Application state initialized");

    // Watchlist refreshes would hang off this subscription
    let mut events = state.watchlist.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(WatchlistEvent::Added { symbol, company_name }) => {
                    tracing::info!("Watchlist changed: added {} ({})", symbol, company_name)
                }
                Ok(WatchlistEvent::Removed { symbol }) => {
                    tracing::info!("Watchlist changed: removed {}", symbol)
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} watchlist events", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let rows = WatchlistService::load(state.api.clone(), &state.watchlist).await?;
    for row in &rows {
        tracing::info!(
            "{:<6} {:<24} {:>12} {:>8}",
            row.symbol,
            row.company_name,
            row.price,
            row.change_percentage
        );
    }

    let top_stories = NewsService::load(state.api.as_ref(), NewsScope::TopStories).await;
    tracing::info!("Loaded {} top stories", top_stories.len());

    if let Some(row) = rows.first() {
        let (details, mut updates) =
            state.stock_details(&row.symbol, &row.company_name, row.candles.clone());
        tracing::info!("Opening details for {}", details.title());

        let load = details.load();
        load.header.await?;
        load.news.await?;

        while let Ok(update) = updates.try_recv() {
            match update {
                DetailsUpdate::Header(header) => {
                    tracing::info!(
                        "Header: {} chart points, {} metrics",
                        header.chart.data.len(),
                        header.metrics.len()
                    );
                    for metric in &header.metrics {
                        tracing::info!("  {}: {}", metric.name, metric.value);
                    }
                }
                DetailsUpdate::Stories(stories) => {
                    tracing::info!("News: {} stories", stories.len());
                    for story in stories.iter().take(5) {
                        tracing::info!("  [{}] {} ({})", story.source, story.headline, story.date_string);
                    }
                }
            }
        }

        let header = details.news_header()?;
        tracing::info!("{} (add button shown: {})", header.title, header.show_add_button);
    }

    Ok(())
}
