//! Finnhub adapter

use crate::api::transport::{HttpTransport, ReqwestTransport};
use crate::api::types::*;
use crate::api::{MarketApi, NewsScope};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

const NEWS_DATE_FORMAT: &str = "%Y-%m-%d";
const COMPANY_NEWS_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Search,
    TopStories,
    CompanyNews,
    MarketData,
    Financials,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Search => "search",
            Endpoint::TopStories => "news",
            Endpoint::CompanyNews => "company-news",
            Endpoint::MarketData => "stock/candle",
            Endpoint::Financials => "stock/metric",
        }
    }
}

/// `from`/`to` dates for company news: the seven days ending `now`
pub fn company_news_window(now: DateTime<Utc>) -> (String, String) {
    let from = now - Duration::days(COMPANY_NEWS_DAYS);
    (
        from.format(NEWS_DATE_FORMAT).to_string(),
        now.format(NEWS_DATE_FORMAT).to_string(),
    )
}

/// `from`/`to` unix seconds for candles: `[now - (days_back + 1)d, now - 1d]`
pub fn candle_window(now: DateTime<Utc>, days_back: i64) -> (i64, i64) {
    let to = now - Duration::days(1);
    let from = to - Duration::days(days_back);
    (from.timestamp(), to.timestamp())
}

/// Finnhub REST client
pub struct FinnhubClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    api_key: String,
}

impl FinnhubClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() || !base_url.path().ends_with('/') {
            return Err(AppError::InvalidUrl(format!(
                "Base URL must be hierarchical and end with '/': {}",
                base_url
            )));
        }

        Ok(Self {
            transport,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Build a client with the `reqwest` transport described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.http_timeout)?);
        Self::new(transport, &config.base_url, config.api_key.clone())
    }

    fn url(&self, endpoint: Endpoint, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(endpoint.path())?;

        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query.append_pair("token", &self.api_key);
        }

        tracing::debug!("Request {} ({} params)", url.path(), params.len());
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(&self, url: Result<Url>) -> Result<T> {
        let url = url?;
        let body = self.transport.get(&url).await?;

        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(AppError::NoDataReturned);
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MarketApi for FinnhubClient {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidUrl("Search query is empty".to_string()));
        }

        self.request(self.url(Endpoint::Search, &[("q", query.to_string())]))
            .await
    }

    async fn news(&self, scope: NewsScope) -> Result<Vec<NewsStory>> {
        let url = match scope {
            NewsScope::TopStories => {
                self.url(Endpoint::TopStories, &[("category", "general".to_string())])
            }
            NewsScope::Company(symbol) => {
                let (from, to) = company_news_window(Utc::now());
                self.url(
                    Endpoint::CompanyNews,
                    &[("symbol", symbol), ("from", from), ("to", to)],
                )
            }
        };

        self.request(url).await
    }

    async fn market_data(&self, symbol: &str, days_back: i64) -> Result<MarketDataResponse> {
        let (from, to) = candle_window(Utc::now(), days_back);

        self.request(self.url(
            Endpoint::MarketData,
            &[
                ("symbol", symbol.to_string()),
                ("resolution", "1".to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ],
        ))
        .await
    }

    async fn financial_metrics(&self, symbol: &str) -> Result<FinancialMetricsResponse> {
        self.request(self.url(
            Endpoint::Financials,
            &[("symbol", symbol.to_string()), ("metric", "all".to_string())],
        ))
        .await
    }
}
