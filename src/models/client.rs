//! Language model client
//!
//! [`LanguageModel`] is the boundary the tutor talks to. [`GroqClient`] speaks
//! the OpenAI-compatible chat-completions API that Groq exposes.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::{ModelConfig, GROQ_API_KEY_ENV};
use crate::errors::{EduBotError, Result};
use crate::models::image::process_image;
use crate::models::types::{ChatMessage, ChatRequest, ChatResponse};

/// Request timeout for a single completion
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Generates text from a prompt and an optional image
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// `image` may be a data URL, a file path or raw base64
    async fn generate(&self, prompt: &str, image: Option<&str>) -> Result<String>;
}

/// Chat-completions client for Groq
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl GroqClient {
    /// Create a client; fails when no API key is configured
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                EduBotError::Config(format!(
                    "{} not set. Get one at https://console.groq.com",
                    GROQ_API_KEY_ENV
                ))
            })?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(EduBotError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.name.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    async fn generate(&self, prompt: &str, image: Option<&str>) -> Result<String> {
        let image_b64 = image.map(process_image).transpose()?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt, image_b64.as_deref())],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, with_image = image_b64.is_some(), "Requesting completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EduBotError::ModelApi(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EduBotError::ModelApi(format!("HTTP {}: {}", status, error_text)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| EduBotError::ModelApi(format!("Failed to parse response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EduBotError::ModelApi("response contained no completion".into()))
    }
}
