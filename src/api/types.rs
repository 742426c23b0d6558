//! Common market data types

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Symbol search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub count: i64,
    pub result: Vec<SearchResult>,
}

/// Single symbol search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub description: String,
    pub display_symbol: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// News story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsStory {
    #[serde(rename = "headline")]
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(rename = "datetime", with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub related: String,
    #[serde(default)]
    pub id: Option<i64>,
}

/// Candle response (parallel arrays)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketDataResponse {
    #[serde(rename = "c", default)]
    pub close: Vec<f64>,
    #[serde(rename = "h", default)]
    pub high: Vec<f64>,
    #[serde(rename = "l", default)]
    pub low: Vec<f64>,
    #[serde(rename = "o", default)]
    pub open: Vec<f64>,
    #[serde(rename = "t", default)]
    pub timestamp: Vec<i64>,
    #[serde(rename = "s")]
    pub status: String,
}

impl MarketDataResponse {
    /// Whether the provider reported data for the window
    pub fn has_data(&self) -> bool {
        self.status == "ok" && !self.timestamp.is_empty()
    }

    /// Zip the arrays into candles, newest first.
    ///
    /// Stops at the shortest array.
    pub fn candle_sticks(&self) -> Vec<CandleStick> {
        let mut candles: Vec<CandleStick> = self
            .timestamp
            .iter()
            .zip(self.open.iter())
            .zip(self.high.iter())
            .zip(self.low.iter())
            .zip(self.close.iter())
            .filter_map(|((((ts, open), high), low), close)| {
                Utc.timestamp_opt(*ts, 0).single().map(|date| CandleStick {
                    date,
                    open: *open,
                    high: *high,
                    low: *low,
                    close: *close,
                })
            })
            .collect();

        candles.sort_by(|a, b| b.date.cmp(&a.date));
        candles
    }
}

/// One OHLC sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleStick {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Financial metrics response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialMetricsResponse {
    pub metric: Metrics,
}

/// Headline financial metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "52WeekHigh")]
    pub annual_high: f64,
    #[serde(rename = "52WeekLow")]
    pub annual_low: f64,
    #[serde(rename = "52WeekPriceReturnDaily")]
    pub annual_return: f64,
    pub beta: f64,
    #[serde(rename = "10DayAverageTradingVolume")]
    pub ten_day_avg_volume: f64,
}
