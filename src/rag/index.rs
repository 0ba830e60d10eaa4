//! In-memory retrieval index over a folder of study material.
//!
//! The index publishes one immutable [`IndexSnapshot`] at a time. `rebuild`
//! reads, chunks and embeds the whole folder into a fresh snapshot and swaps
//! it in; `query` clones the current snapshot and scores it without holding
//! any lock, so readers see either the old corpus or the new one, never a mix.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::errors::{EduBotError, Result};
use crate::rag::chunker::{Chunk, Chunker};
use crate::rag::embedding::{Embedder, Embedding};
use crate::rag::similarity::cosine_similarity;

/// One file of the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name, used as the source identifier
    pub id: String,
    pub text: String,
}

/// A retrieved chunk with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub score: f32,
    pub text: String,
    pub source_id: String,
    pub chunk_index: usize,
    pub length: usize,
}

/// Outcome of a successful rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RebuildReport {
    /// Regular files read and chunked; excludes subdirectories and skipped entries
    pub documents: usize,
    /// Documents skipped because they could not be read
    pub skipped: usize,
    pub chunks: usize,
}

/// Positionally aligned chunks and vectors of one corpus version
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    chunks: Vec<Chunk>,
    vectors: Vec<Embedding>,
}

impl IndexSnapshot {
    fn new(chunks: Vec<Chunk>, vectors: Vec<Embedding>) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(EduBotError::Embedding(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        if let Some(first) = vectors.first() {
            let dimension = first.len();
            if dimension == 0 || vectors.iter().any(|v| v.len() != dimension) {
                return Err(EduBotError::Embedding(
                    "embedder returned vectors of inconsistent dimension".into(),
                ));
            }
        }
        Ok(Self { chunks, vectors })
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn vectors(&self) -> &[Embedding] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Dimension of the stored vectors, `None` when empty
    pub fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }

    /// Rank every chunk against `query` and keep the best `k`.
    ///
    /// Ties keep ascending flat position.
    pub fn top_k(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(query, v)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, score)| {
                let chunk = &self.chunks[i];
                ScoredChunk {
                    score,
                    text: chunk.text.clone(),
                    source_id: chunk.source_id.clone(),
                    chunk_index: chunk.chunk_index,
                    length: chunk.length,
                }
            })
            .collect()
    }
}

/// Retrieval index over the files of one folder
pub struct RetrievalIndex {
    source: PathBuf,
    chunker: Chunker,
    embedder: Arc<dyn Embedder>,
    snapshot: RwLock<Arc<IndexSnapshot>>,
    rebuild_lock: Mutex<()>,
}

impl RetrievalIndex {
    /// Create an empty index; nothing is read until [`rebuild`](Self::rebuild)
    pub fn new(source: impl Into<PathBuf>, chunker: Chunker, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            source: source.into(),
            chunker,
            embedder,
            snapshot: RwLock::new(Arc::new(IndexSnapshot::default())),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn chunker(&self) -> Chunker {
        self.chunker
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Re-read, re-chunk and re-embed the whole folder, then publish.
    ///
    /// Unreadable documents are skipped. On error the previously published
    /// snapshot stays in place.
    pub fn rebuild(&self) -> Result<RebuildReport> {
        let _writer = self.rebuild_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let (documents, skipped) = load_documents(&self.source)?;

        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| self.chunker.chunk(&doc.id, &doc.text))
            .collect();

        let report = RebuildReport {
            documents: documents.len(),
            skipped,
            chunks: chunks.len(),
        };

        let snapshot = if chunks.is_empty() {
            IndexSnapshot::default()
        } else {
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            debug!(chunks = texts.len(), "Embedding corpus");
            let vectors = self.embedder.embed_batch(&texts)?;
            IndexSnapshot::new(chunks, vectors)?
        };

        self.publish(snapshot);
        info!(
            chunks = report.chunks,
            documents = report.documents,
            skipped = report.skipped,
            "Indexed {} chunks from {} documents",
            report.chunks,
            report.documents
        );
        Ok(report)
    }

    fn publish(&self, snapshot: IndexSnapshot) {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
    }

    /// The `k` chunks most similar to `text`, best first.
    ///
    /// An empty index or `k == 0` yields no results without touching the
    /// embedder.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let snapshot = self.snapshot();
        if k == 0 || snapshot.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed_one(text)?;
        if Some(query.len()) != snapshot.dimension() {
            return Err(EduBotError::Embedding(format!(
                "query vector has dimension {}, index has {:?}",
                query.len(),
                snapshot.dimension()
            )));
        }

        Ok(snapshot.top_k(&query, k))
    }
}

/// Read every non-directory entry of `dir`, sorted by file name.
///
/// Returns the documents and the number of entries skipped as unreadable.
pub fn load_documents(dir: &Path) -> Result<(Vec<Document>, usize)> {
    let entries = fs::read_dir(dir).map_err(|e| EduBotError::SourceUnavailable {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut skipped = 0;
    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push((entry.file_name(), entry.path())),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                skipped += 1;
            }
        }
    }
    paths.sort_by(|a, b| a.0.cmp(&b.0));

    let mut documents = Vec::with_capacity(paths.len());
    for (name, path) in paths {
        let id = name.to_string_lossy().into_owned();
        match read_document(&id, &path) {
            Ok(Some(doc)) => documents.push(doc),
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "Skipping document");
                skipped += 1;
            }
        }
    }

    Ok((documents, skipped))
}

/// `Ok(None)` for directories
fn read_document(id: &str, path: &Path) -> Result<Option<Document>> {
    let corpus_error = |e: std::io::Error| EduBotError::CorpusRead {
        source_id: id.to_string(),
        reason: e.to_string(),
    };

    if fs::metadata(path).map_err(corpus_error)?.is_dir() {
        return Ok(None);
    }

    let bytes = fs::read(path).map_err(corpus_error)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!(source_id = id, "Document is not valid UTF-8, dropping invalid bytes");
            decode_lossy(e.as_bytes())
        }
    };

    Ok(Some(Document {
        id: id.to_string(),
        text,
    }))
}

/// Decode UTF-8, dropping invalid byte sequences
fn decode_lossy(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
