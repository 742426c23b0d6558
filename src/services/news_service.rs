//! News Service
//!
//! Loads a news feed for the news panel. Errors are logged and the panel
//! shows an empty list.

use crate::api::{MarketApi, NewsScope};
use crate::services::view_models::NewsStoryViewModel;
use tracing::{info, warn};

/// News service for business logic
pub struct NewsService;

impl NewsService {
    /// Story rows for a scope, in provider order
    pub async fn load(api: &dyn MarketApi, scope: NewsScope) -> Vec<NewsStoryViewModel> {
        info!("NewsService::load - {:?}", scope);

        match api.news(scope).await {
            Ok(stories) => stories.iter().map(NewsStoryViewModel::from).collect(),
            Err(e) => {
                warn!("Failed to fetch news: [{}] {}", e.code(), e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{sample_story, FakeMarketApi};

    #[tokio::test]
    async fn test_load_top_stories() {
        let api = FakeMarketApi {
            stories: Some(vec![
                sample_story("Markets rally", "https://example.com/1"),
                sample_story("Fed holds", "https://example.com/2"),
            ]),
            ..Default::default()
        };

        let rows = NewsService::load(&api, NewsScope::TopStories).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].headline, "Markets rally");
        assert_eq!(rows[1].source, "Reuters");
    }

    #[tokio::test]
    async fn test_failure_is_empty() {
        let api = FakeMarketApi::default();
        let rows = NewsService::load(&api, NewsScope::Company("AAPL".to_string())).await;
        assert!(rows.is_empty());
    }
}
