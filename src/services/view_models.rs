//! Render-ready view models handed to a UI shell

use crate::api::types::{Metrics, NewsStory};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Line chart input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartViewModel {
    /// Closing prices, oldest first
    pub data: Vec<f64>,
    pub show_legend: bool,
    pub show_axis: bool,
}

/// One labelled metric cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricViewModel {
    pub name: String,
    pub value: String,
}

/// Details screen header: chart plus metric grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderViewModel {
    pub chart: ChartViewModel,
    pub metrics: Vec<MetricViewModel>,
}

/// Section header above the news list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsHeaderViewModel {
    pub title: String,
    pub show_add_button: bool,
}

/// One news row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsStoryViewModel {
    pub source: String,
    pub headline: String,
    pub date_string: String,
    pub image_url: Option<String>,
}

impl From<&NewsStory> for NewsStoryViewModel {
    fn from(story: &NewsStory) -> Self {
        Self {
            source: story.source.clone(),
            headline: story.title.clone(),
            date_string: pretty_date(story.date),
            image_url: Some(story.image.clone()).filter(|url| !url.is_empty()),
        }
    }
}

/// Metric cells in display order; empty without metrics
pub fn metric_view_models(metrics: Option<&Metrics>) -> Vec<MetricViewModel> {
    let Some(metrics) = metrics else {
        return Vec::new();
    };

    [
        ("52W High", metrics.annual_high),
        ("52W Low", metrics.annual_low),
        ("52W Return", metrics.annual_return),
        ("Beta", metrics.beta),
        ("10D Vol.", metrics.ten_day_avg_volume),
    ]
    .into_iter()
    .map(|(name, value)| MetricViewModel {
        name: name.to_string(),
        value: value.to_string(),
    })
    .collect()
}

/// `Mar 5, 2024`
pub fn pretty_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

const MISSING_VALUE: &str = "--";

/// `$1,234.56`
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return MISSING_VALUE.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let cents = format!("{:.2}", value.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{}", sign, grouped, fraction)
}

/// Fraction as a signed percentage, `0.0123` -> `+1.23%`
pub fn format_percent(fraction: f64) -> String {
    let percent = fraction * 100.0;
    if percent.abs() < 0.005 {
        "0.00%".to_string()
    } else {
        format!("{:+.2}%", percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{sample_metrics, sample_story};

    #[test]
    fn test_metric_labels() {
        let metrics = sample_metrics();
        let cells = metric_view_models(Some(&metrics));
        let names: Vec<&str> = cells.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["52W High", "52W Low", "52W Return", "Beta", "10D Vol."]);
        assert_eq!(cells[0].value, "182.94");
        assert!(metric_view_models(None).is_empty());
    }

    #[test]
    fn test_story_view_model() {
        let story = sample_story("Apple ships", "https://example.com/a");
        let vm = NewsStoryViewModel::from(&story);
        assert_eq!(vm.headline, "Apple ships");
        assert_eq!(vm.date_string, "Mar 5, 2024");
        assert!(vm.image_url.is_none());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(182.944), "$182.94");
        assert_eq!(format_price(1234.5), "$1,234.50");
        assert_eq!(format_price(1234567.891), "$1,234,567.89");
        assert_eq!(format_price(-12.3), "-$12.30");
    }

    #[test]
    fn test_format_price_non_finite() {
        assert_eq!(format_price(f64::NAN), "--");
        assert_eq!(format_price(f64::INFINITY), "--");
        assert_eq!(format_price(f64::NEG_INFINITY), "--");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0123), "+1.23%");
        assert_eq!(format_percent(-0.05), "-5.00%");
        assert_eq!(format_percent(0.0), "0.00%");
    }
}
