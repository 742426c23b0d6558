//! Search Service
//!
//! Symbol search for the search bar.

use crate::api::types::SearchResult;
use crate::api::MarketApi;
use tracing::{info, warn};

/// Search service for business logic
pub struct SearchService;

impl SearchService {
    /// Search symbols; blank queries skip the request
    pub async fn search(api: &dyn MarketApi, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        info!("SearchService::search - query={}", query);

        match api.search(query).await {
            Ok(response) => response.result,
            Err(e) => {
                warn!("Search for '{}' failed: [{}] {}", query, e.code(), e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeMarketApi;
    use std::sync::atomic::Ordering;

    fn apple() -> SearchResult {
        SearchResult {
            description: "APPLE INC".to_string(),
            display_symbol: "AAPL".to_string(),
            symbol: "AAPL".to_string(),
            kind: "Common Stock".to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_query_skips_request() {
        let api = FakeMarketApi {
            search_results: Some(vec![apple()]),
            ..Default::default()
        };

        assert!(SearchService::search(&api, "   ").await.is_empty());
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_returns_results() {
        let api = FakeMarketApi {
            search_results: Some(vec![apple()]),
            ..Default::default()
        };

        let results = SearchService::search(&api, "apple").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_failure_is_empty() {
        let api = FakeMarketApi::default();
        assert!(SearchService::search(&api, "apple").await.is_empty());
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 1);
    }
}
