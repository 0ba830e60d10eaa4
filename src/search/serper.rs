//! Google-style search through serper.dev

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::{SearchConfig, SERPER_API_KEY_ENV};
use crate::errors::{EduBotError, Result};
use crate::search::{WebResult, WebSearch};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<WebResult>,
}

/// serper.dev client. A missing key only fails when a search is attempted.
#[derive(Debug, Clone)]
pub struct SerperClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl SerperClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("edubot/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(EduBotError::Http)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl WebSearch for SerperClient {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<WebResult>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EduBotError::Search(format!("Missing {}", SERPER_API_KEY_ENV)))?;

        debug!(query, num_results, "Searching the web");
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .json(&SearchRequest {
                q: query,
                num: num_results,
            })
            .send()
            .await
            .map_err(|e| EduBotError::Search(format!("Search failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(EduBotError::Search(format!(
                "Search API returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| EduBotError::Search(format!("Failed to parse results: {}", e)))?;

        Ok(body.organic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organic_results() {
        let body = r#"{
            "searchParameters": {"q": "photosynthesis"},
            "organic": [
                {"title": "Photosynthesis", "link": "https://example.org/p", "snippet": "Plants make food", "position": 1},
                {"title": "No snippet", "link": "https://example.org/n"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.organic.len(), 2);
        assert_eq!(parsed.organic[0].snippet, "Plants make food");
        assert_eq!(parsed.organic[1].snippet, "");
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let body = r#"{"organic": [{"title": "Tides", "link": null, "snippet": null}]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.organic.len(), 1);
        assert_eq!(parsed.organic[0].title, "Tides");
        assert_eq!(parsed.organic[0].link, "");
        assert_eq!(parsed.organic[0].snippet, "");
    }

    #[test]
    fn test_missing_organic_is_empty() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"answerBox": {}}"#).unwrap();
        assert!(parsed.organic.is_empty());
    }

    #[tokio::test]
    async fn test_search_without_key_fails() {
        let client = SerperClient::new(&SearchConfig::default()).unwrap();
        assert!(!client.has_api_key());
        let err = client.search("anything", 5).await.unwrap_err();
        assert!(matches!(err, EduBotError::Search(_)));
    }
}
