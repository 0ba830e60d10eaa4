//! Shared fakes for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use edubot::errors::{EduBotError, Result};
use edubot::models::LanguageModel;
use edubot::rag::{Chunker, Embedder, Embedding, RetrievalIndex};
use edubot::search::{WebResult, WebSearch};

pub const DIM: usize = 26;

/// Letter-frequency embedder: deterministic and cheap, similar texts score high
#[derive(Default)]
pub struct LetterEmbedder {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl LetterEmbedder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn letter_vector(text: &str) -> Embedding {
    let mut v = vec![0.0; DIM];
    for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
        v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
    }
    v
}

impl Embedder for LetterEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EduBotError::Embedding("model offline".into()));
        }
        Ok(texts.iter().map(|t| letter_vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

/// Returns one vector fewer than asked for
pub struct ShortEmbedder;

impl Embedder for ShortEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().skip(1).map(|t| letter_vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

pub fn index_over(dir: &Path, chunk_size: usize, overlap: usize, embedder: Arc<dyn Embedder>) -> RetrievalIndex {
    RetrievalIndex::new(dir, Chunker::new(chunk_size, overlap).unwrap(), embedder)
}

/// Replays canned answers and records every prompt it was given
#[derive(Default)]
pub struct ScriptedModel {
    answers: Mutex<VecDeque<Result<String>>>,
    pub prompts: Mutex<Vec<String>>,
    pub images: Mutex<Vec<Option<String>>>,
}

impl ScriptedModel {
    pub fn new(answers: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into()),
            ..Default::default()
        })
    }

    pub fn replying(answers: &[&str]) -> Arc<Self> {
        Self::new(answers.iter().map(|a| Ok(a.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str, image: Option<&str>) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.images.lock().unwrap().push(image.map(str::to_string));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EduBotError::ModelApi("no scripted answer left".into())))
    }
}

/// Fixed search results, or a failure
pub struct FakeSearch {
    results: Option<Vec<WebResult>>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn with_results(count: usize) -> Arc<Self> {
        let results = (0..count)
            .map(|i| WebResult {
                title: format!("Result {}", i),
                link: format!("https://example.org/{}", i),
                snippet: format!("snippet {}", i),
            })
            .collect();
        Arc::new(Self {
            results: Some(results),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            results: None,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl WebSearch for FakeSearch {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<WebResult>> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), num_results));
        self.results
            .clone()
            .ok_or_else(|| EduBotError::Search("Missing SERPER_API_KEY".into()))
    }
}
