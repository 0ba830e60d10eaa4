use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::EduBotError;

pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const SERPER_API_KEY_ENV: &str = "SERPER_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rag: RagConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Turn retrieval off entirely (the embedder is never loaded)
    pub enabled: bool,
    /// Folder whose files make up the corpus
    pub folder: PathBuf,
    /// Chunk length in characters
    pub chunk_size: usize,
    /// Characters repeated between consecutive chunks
    pub chunk_overlap: usize,
    /// Chunks retrieved per question
    pub top_k: usize,
    /// HuggingFace repository of the sentence-embedding model
    pub embedding_model: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            folder: PathBuf::from("rag_data"),
            chunk_size: 800,
            chunk_overlap: 100,
            top_k: 4,
            embedding_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub name: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            name: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            max_tokens: 512,
            temperature: 0.7,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub num_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://google.serper.dev/search".to_string(),
            num_results: 5,
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// The default file is created with default values when it does not exist.
    /// API keys from the environment override the ones in the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    Self::load_from(&default_path)?
                } else {
                    let config = Config::default();
                    config.save(&default_path)?;
                    config
                }
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".edubot").join("config.toml"))
    }

    fn apply_env(&mut self) {
        if let Some(key) = non_empty_env(GROQ_API_KEY_ENV) {
            self.model.api_key = Some(key);
        }
        if let Some(key) = non_empty_env(SERPER_API_KEY_ENV) {
            self.search.api_key = Some(key);
        }
    }

    /// Reject settings the index and tutor cannot run with
    pub fn validate(&self) -> std::result::Result<(), EduBotError> {
        if self.rag.chunk_size == 0 {
            return Err(EduBotError::Config("rag.chunk_size must be positive".into()));
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(EduBotError::Config(format!(
                "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(EduBotError::Config("rag.top_k must be positive".into()));
        }
        Ok(())
    }

    /// Copy of the configuration safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.model.api_key.is_some() {
            copy.model.api_key = Some("***".to_string());
        }
        if copy.search.api_key.is_some() {
            copy.search.api_key = Some("***".to_string());
        }
        copy
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
