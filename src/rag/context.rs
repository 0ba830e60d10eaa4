// Context assembly: turns retrieved chunks into the study-material block of a prompt
use serde::{Deserialize, Serialize};

use crate::rag::index::ScoredChunk;

/// Separator placed between study-material entries
pub const MATERIAL_SEPARATOR: &str = "\n\n---\n";

/// Assembled context for prompt augmentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// The formatted study-material block, empty when nothing was retrieved
    pub text: String,
    /// Number of chunks included
    pub chunk_count: usize,
    /// Source file names, deduplicated in order of first appearance
    pub sources: Vec<String>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.chunk_count == 0
    }
}

/// Build the study-material block from ranked chunks
pub fn build_context(results: &[ScoredChunk]) -> AssembledContext {
    let text = results
        .iter()
        .map(|r| format!("[Study Material #{}]:\n{}", r.chunk_index, r.text))
        .collect::<Vec<_>>()
        .join(MATERIAL_SEPARATOR);

    AssembledContext {
        text,
        chunk_count: results.len(),
        sources: unique_sources(results),
    }
}

/// Source ids of `results`, each once, in order of first appearance
pub fn unique_sources(results: &[ScoredChunk]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for r in results {
        if !sources.contains(&r.source_id) {
            sources.push(r.source_id.clone());
        }
    }
    sources
}
