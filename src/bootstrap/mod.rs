//! Startup wiring for EduBot
//!
//! Probes the embedding model, constructs the retrieval index and the tutor,
//! and runs the startup index build. Nothing here is global: every component
//! is built once and handed to whoever needs it.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::Result;
use crate::models::{GroqClient, LanguageModel};
use crate::rag::{BertEmbedder, Chunker, Embedder, RebuildReport, RetrievalIndex};
use crate::search::{SerperClient, WebSearch};
use crate::tutor::{Tutor, TutorSettings};

/// Outcome of the embedding-model probe
pub enum RagStatus {
    Enabled(Arc<dyn Embedder>),
    /// Turned off in the configuration
    Disabled,
    /// Configured on, but the model could not be loaded
    Unavailable(String),
}

impl RagStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, RagStatus::Enabled(_))
    }
}

/// Decide whether retrieval can run by trying to load the embedding model
pub fn probe_embedder(config: &Config) -> RagStatus {
    if !config.rag.enabled {
        info!("Retrieval disabled in configuration");
        return RagStatus::Disabled;
    }

    match BertEmbedder::load(&config.rag.embedding_model) {
        Ok(embedder) => RagStatus::Enabled(Arc::new(embedder)),
        Err(e) => {
            warn!(error = %e, "RAG not available, embedding model failed to load");
            RagStatus::Unavailable(e.to_string())
        }
    }
}

/// Construct an empty index over the configured folder
pub fn build_index(config: &Config, embedder: Arc<dyn Embedder>) -> Result<RetrievalIndex> {
    let chunker = Chunker::new(config.rag.chunk_size, config.rag.chunk_overlap)?;
    Ok(RetrievalIndex::new(
        config.rag.folder.clone(),
        chunker,
        embedder,
    ))
}

/// Build the index on a blocking thread. A failure is logged, not returned,
/// so the server still comes up with an empty index.
pub async fn initial_rebuild(index: Arc<RetrievalIndex>) -> Option<RebuildReport> {
    let folder = index.source().display().to_string();
    match tokio::task::spawn_blocking(move || index.rebuild()).await {
        Ok(Ok(report)) => Some(report),
        Ok(Err(e)) => {
            error!(error = %e, folder, "RAG index skipped");
            None
        }
        Err(e) => {
            error!(error = %e, folder, "RAG index task panicked");
            None
        }
    }
}

/// Wire the tutor from configuration and an optional index
pub fn build_tutor(config: &Config, index: Option<Arc<RetrievalIndex>>) -> Result<Tutor> {
    let model: Arc<dyn LanguageModel> = Arc::new(GroqClient::new(&config.model)?);
    info!(model = %config.model.name, "Language model client ready");

    let search: Arc<dyn WebSearch> = Arc::new(SerperClient::new(&config.search)?);

    Ok(Tutor::new(
        index,
        model,
        search,
        TutorSettings {
            top_k: config.rag.top_k,
            web_results: config.search.num_results,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_respects_disabled_flag() {
        let mut config = Config::default();
        config.rag.enabled = false;
        let status = probe_embedder(&config);
        assert!(matches!(status, RagStatus::Disabled));
        assert!(!status.is_enabled());
    }

    #[test]
    fn test_build_tutor_requires_model_key() {
        let config = Config::default();
        assert!(build_tutor(&config, None).is_err());
    }

    #[test]
    fn test_build_tutor_without_index() {
        let mut config = Config::default();
        config.model.api_key = Some("gsk_test".to_string());
        let tutor = build_tutor(&config, None).unwrap();
        assert!(!tutor.rag_enabled());
    }
}
