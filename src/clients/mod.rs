//! Outbound network clients for conversation and web search

pub mod google;
pub mod openrouter;

pub use google::{GoogleSearchClient, DEFAULT_SEARCH_BASE_URL};
pub use openrouter::{OpenRouterClient, DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL};

use crate::{EiraError, Result};
use async_trait::async_trait;

/// Conversational model behind the fallback intent
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send one prompt and return the assistant's reply text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// A single web search result
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchHit {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

/// Web search backend; `Ok(None)` means the query had no results
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Option<SearchHit>>;
}

/// Map a non-success HTTP status to the error taxonomy
pub(crate) fn status_error(service: &str, status: reqwest::StatusCode, body: &str) -> EiraError {
    let detail = body.chars().take(200).collect::<String>();
    match status.as_u16() {
        401 | 403 => EiraError::AuthError(format!("{} rejected credentials ({})", service, status)),
        _ => EiraError::TransportError(format!("{} returned {}: {}", service, status, detail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error("Chat", StatusCode::UNAUTHORIZED, ""),
            EiraError::AuthError(_)
        ));
        assert!(matches!(
            status_error("Chat", StatusCode::FORBIDDEN, ""),
            EiraError::AuthError(_)
        ));
        assert!(matches!(
            status_error("Chat", StatusCode::BAD_GATEWAY, "upstream"),
            EiraError::TransportError(_)
        ));
    }
}
