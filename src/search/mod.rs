//! Web search fallback
//!
//! The tutor asks the web when the student requests it or when the model
//! answers that it needs current information.

pub mod serper;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::Result;

pub use serper::SerperClient;

/// One organic search hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub snippet: String,
}

/// Missing and `null` fields both read as ""
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Searches the web for a query
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<WebResult>>;
}
