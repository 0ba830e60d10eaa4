// Retrieval over local study material
//
// Components:
// - Chunker: fixed-size character windows with overlap
// - Embedder: text -> vector capability (BERT backend via candle)
// - RetrievalIndex: corpus snapshot, rebuild and cosine top-k query
// - Context: study-material block and source list for prompts

pub mod chunker;
pub mod context;
pub mod embedding;
pub mod index;
pub mod similarity;

// Re-export key types
pub use chunker::{Chunk, Chunker};
pub use context::{build_context, unique_sources, AssembledContext};
pub use embedding::{BertEmbedder, Embedder, Embedding};
pub use index::{IndexSnapshot, RebuildReport, RetrievalIndex, ScoredChunk};
pub use similarity::cosine_similarity;
