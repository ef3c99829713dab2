//! Google Custom Search client

use super::{status_error, SearchClient, SearchHit};
use crate::{EiraError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.googleapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

pub struct GoogleSearchClient {
    client: Client,
    api_key: String,
    engine_id: String,
    base_url: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EiraError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SearchClient for GoogleSearchClient {
    async fn search(&self, query: &str) -> Result<Option<SearchHit>> {
        let url = format!("{}/customsearch/v1", self.base_url);
        debug!("Searching for '{}'", query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("Search service", status, &body));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| EiraError::ParseError(format!("Malformed search response: {}", e)))?;

        Ok(body.items.into_iter().next().map(|item| SearchHit {
            title: item.title,
            link: item.link,
            snippet: item.snippet,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_without_items() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"kind":"customsearch#search"}"#).unwrap();
        assert!(body.items.is_empty());
    }

    #[test]
    fn test_item_without_snippet() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"items":[{"title":"X9000"}]}"#).unwrap();
        assert_eq!(body.items[0].title.as_deref(), Some("X9000"));
        assert!(body.items[0].snippet.is_none());
    }
}
