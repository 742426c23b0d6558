//! Test doubles for the network seams

use crate::api::transport::HttpTransport;
use crate::api::types::*;
use crate::api::{MarketApi, NewsScope};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

/// Canned transport outcome
pub enum FakeResponse {
    Body(String),
    Fail(String),
}

/// Transport replaying canned responses in order
pub struct FakeTransport {
    responses: Mutex<VecDeque<FakeResponse>>,
    requests: Mutex<Vec<Url>>,
}

impl FakeTransport {
    pub fn new(responses: Vec<FakeResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>> {
        self.requests.lock().push(url.clone());
        match self.responses.lock().pop_front() {
            Some(FakeResponse::Body(body)) => Ok(body.into_bytes()),
            Some(FakeResponse::Fail(msg)) => Err(AppError::Network(msg)),
            None => Err(AppError::Network("no canned response".to_string())),
        }
    }
}

/// `MarketApi` with fixed answers; `None` answers fail with a network error
#[derive(Default)]
pub struct FakeMarketApi {
    pub metrics: Option<Metrics>,
    pub stories: Option<Vec<NewsStory>>,
    pub candles: Option<MarketDataResponse>,
    pub search_results: Option<Vec<SearchResult>>,
    pub delay: Duration,
    pub metrics_calls: AtomicUsize,
    pub news_calls: AtomicUsize,
    pub market_data_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
}

impl FakeMarketApi {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn offline() -> AppError {
    AppError::Network("offline".to_string())
}

#[async_trait]
impl MarketApi for FakeMarketApi {
    async fn search(&self, _query: &str) -> Result<SearchResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let result = self.search_results.clone().ok_or_else(offline)?;
        Ok(SearchResponse {
            count: result.len() as i64,
            result,
        })
    }

    async fn news(&self, _scope: NewsScope) -> Result<Vec<NewsStory>> {
        self.news_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.stories.clone().ok_or_else(offline)
    }

    async fn market_data(&self, _symbol: &str, _days_back: i64) -> Result<MarketDataResponse> {
        self.market_data_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.candles.clone().ok_or_else(offline)
    }

    async fn financial_metrics(&self, _symbol: &str) -> Result<FinancialMetricsResponse> {
        self.metrics_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let metric = self.metrics.clone().ok_or_else(offline)?;
        Ok(FinancialMetricsResponse { metric })
    }
}

pub fn sample_metrics() -> Metrics {
    Metrics {
        annual_high: 182.94,
        annual_low: 124.17,
        annual_return: 10.5,
        beta: 1.2,
        ten_day_avg_volume: 61.4,
    }
}

pub fn sample_story(title: &str, url: &str) -> NewsStory {
    NewsStory {
        title: title.to_string(),
        url: url.to_string(),
        source: "Reuters".to_string(),
        date: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
        summary: String::new(),
        image: String::new(),
        category: "company".to_string(),
        related: String::new(),
        id: None,
    }
}

/// Candles as `(unix_seconds, close)`, oldest first like the wire format
pub fn sample_market_data(points: &[(i64, f64)]) -> MarketDataResponse {
    MarketDataResponse {
        close: points.iter().map(|(_, c)| *c).collect(),
        high: points.iter().map(|(_, c)| *c).collect(),
        low: points.iter().map(|(_, c)| *c).collect(),
        open: points.iter().map(|(_, c)| *c).collect(),
        timestamp: points.iter().map(|(t, _)| *t).collect(),
        status: "ok".to_string(),
    }
}
