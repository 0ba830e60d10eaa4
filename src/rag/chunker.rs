//! Fixed-size character chunking with overlap.
//!
//! Offsets count Unicode scalar values, not bytes, so a chunk never splits a
//! multi-byte character and `length` matches what a reader would count.

use serde::{Deserialize, Serialize};

use crate::errors::{EduBotError, Result};

/// A contiguous slice of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Identifier of the owning document (its file name)
    pub source_id: String,
    /// Position of this chunk within its document
    pub chunk_index: usize,
    /// Character count of `text`
    pub length: usize,
}

/// Splits document text into overlapping windows of `chunk_size` characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker.
    ///
    /// Fails when `chunk_size` is zero or `overlap >= chunk_size`; either would
    /// stop the window from advancing.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(EduBotError::Config("chunk size must be positive".into()));
        }
        if overlap >= chunk_size {
            return Err(EduBotError::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Character offset ranges `[start, end)` of every chunk of a text of
    /// `len` characters.
    pub fn spans(&self, len: usize) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut offset = 0;
        while offset < len {
            spans.push((offset, (offset + self.chunk_size).min(len)));
            offset += self.stride();
        }
        spans
    }

    /// Chunk the text of one document
    pub fn chunk(&self, source_id: &str, text: &str) -> Vec<Chunk> {
        // Byte offset of every char boundary, including the end of the text.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = boundaries.len() - 1;

        self.spans(char_len)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, (start, end))| Chunk {
                text: text[boundaries[start]..boundaries[end]].to_string(),
                source_id: source_id.to_string(),
                chunk_index,
                length: end - start,
            })
            .collect()
    }
}
