//! Question answering: retrieval, prompt assembly, generation, web fallback.

pub mod prompt;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::errors::{EduBotError, Result};
use crate::models::LanguageModel;
use crate::rag::{build_context, AssembledContext, RetrievalIndex, ScoredChunk};
use crate::search::WebSearch;
use prompt::{augment_with_web, build_prompt, format_snippets, NEEDS_WEB_MARKER};

/// At most this many web results are reported back as sources
const MAX_WEB_SOURCES: usize = 5;

/// A student's question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Base64 image, data URL or file path
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub use_rag: bool,
    #[serde(default)]
    pub use_web: bool,
}

fn default_true() -> bool {
    true
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            image: None,
            use_rag: true,
            use_web: false,
        }
    }
}

/// A web page the answer drew on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    /// File names of the study material used
    pub rag_sources: Vec<String>,
    pub web_sources: Vec<WebSource>,
    pub used_web: bool,
}

/// Retrieval and search settings for the tutor
#[derive(Debug, Clone, Copy)]
pub struct TutorSettings {
    pub top_k: usize,
    pub web_results: usize,
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            web_results: 5,
        }
    }
}

/// Answers questions with the injected index, model and search client.
///
/// `index` is `None` when retrieval is disabled or its model failed to load.
pub struct Tutor {
    index: Option<Arc<RetrievalIndex>>,
    model: Arc<dyn LanguageModel>,
    search: Arc<dyn WebSearch>,
    settings: TutorSettings,
}

impl Tutor {
    pub fn new(
        index: Option<Arc<RetrievalIndex>>,
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn WebSearch>,
        settings: TutorSettings,
    ) -> Self {
        Self {
            index,
            model,
            search,
            settings,
        }
    }

    pub fn rag_enabled(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<&Arc<RetrievalIndex>> {
        self.index.as_ref()
    }

    /// Answer one question.
    ///
    /// Retrieval and web search failures degrade to "no extra context"; only
    /// a failed first generation is an error.
    pub async fn ask(&self, request: AskRequest) -> Result<AskResponse> {
        let question = request.question.trim().to_string();
        if question.is_empty() {
            return Err(EduBotError::InvalidRequest("question must not be empty".into()));
        }

        let retrieved = if request.use_rag {
            self.retrieve(&question).await
        } else {
            Vec::new()
        };
        let context: AssembledContext = build_context(&retrieved);

        let prompt = build_prompt(&context.text, &question);
        let image = request.image.as_deref();

        let mut answer = self.model.generate(&prompt, image).await?;

        let mut used_web = false;
        let mut web_sources = Vec::new();
        if request.use_web || answer.contains(NEEDS_WEB_MARKER) {
            used_web = true;
            match self.search.search(&question, self.settings.web_results).await {
                Ok(results) => {
                    web_sources = results
                        .iter()
                        .take(MAX_WEB_SOURCES)
                        .map(|r| WebSource {
                            title: r.title.clone(),
                            link: r.link.clone(),
                        })
                        .collect();

                    let augmented = augment_with_web(&prompt, &format_snippets(&results));
                    match self.model.generate(&augmented, image).await {
                        Ok(regenerated) => answer = regenerated,
                        Err(e) => warn!(error = %e, "Web-augmented generation failed"),
                    }
                }
                Err(e) => warn!(error = %e, "Web search failed"),
            }
        }

        info!(
            rag_chunks = context.chunk_count,
            used_web,
            "Answered question"
        );

        Ok(AskResponse {
            answer: answer.trim().to_string(),
            rag_sources: context.sources,
            web_sources,
            used_web,
        })
    }

    /// Top-k chunks for `question`, or nothing when retrieval is off or fails
    async fn retrieve(&self, question: &str) -> Vec<ScoredChunk> {
        let Some(index) = self.index.clone() else {
            return Vec::new();
        };

        let question = question.to_string();
        let top_k = self.settings.top_k;
        match tokio::task::spawn_blocking(move || index.query(&question, top_k)).await {
            Ok(Ok(results)) => {
                debug!(results = results.len(), "Retrieved study material");
                results
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Retrieval failed, answering without study material");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Retrieval task panicked, answering without study material");
                Vec::new()
            }
        }
    }
}
