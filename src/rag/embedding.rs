//! Sentence embeddings for chunks and queries.
//!
//! The index depends only on the [`Embedder`] trait. [`BertEmbedder`] is the
//! production backend: a BERT sentence-transformer loaded from the HuggingFace
//! Hub and run on CPU with candle, mean-pooled over the attention mask.

use anyhow::Context;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::errors::{EduBotError, Result};

/// A fixed-dimension embedding vector
pub type Embedding = Vec<f32>;

/// Maps text to fixed-dimension vectors.
///
/// Implementations must be deterministic for a fixed model and return vectors
/// of one dimension. The index calls them from blocking worker threads.
pub trait Embedder: Send + Sync {
    /// Embed many texts; the output is positionally aligned with `texts`
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single text
    fn embed_one(&self, text: &str) -> Result<Embedding> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| EduBotError::Embedding("embedder returned no vector".into()))
    }

    /// Output dimension
    fn dimension(&self) -> usize;
}

/// Longest token sequence fed to the model; longer chunks are truncated
const MAX_SEQUENCE_TOKENS: usize = 256;

/// BERT sentence-embedding model run through candle
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dimension: usize,
}

impl BertEmbedder {
    /// Download (or reuse the cached copy of) `model_id` and load it on CPU
    pub fn load(model_id: &str) -> Result<Self> {
        let device = Device::Cpu;

        let api = Api::new().context("Failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .context("Failed to download model config")?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .context("Failed to download tokenizer")?;
        let weights_path = repo
            .get("model.safetensors")
            .context("Failed to download model weights")?;

        let config_contents =
            std::fs::read_to_string(config_path).context("Failed to read model config")?;
        let config: Config =
            serde_json::from_str(&config_contents).context("Failed to parse model config")?;
        let raw_config: serde_json::Value = serde_json::from_str(&config_contents)?;
        let dimension = raw_config["hidden_size"]
            .as_u64()
            .ok_or_else(|| EduBotError::Embedding("model config has no hidden_size".into()))?
            as usize;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EduBotError::Embedding(format!("Failed to load tokenizer: {}", e)))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| EduBotError::Embedding(format!("Failed to configure tokenizer: {}", e)))?;

        // SAFETY: the weights file is owned by the hf-hub cache and is not
        // modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .context("Failed to load model weights")?
        };
        let model = BertModel::load(vb, &config).context("Failed to create BERT model")?;

        info!(model = model_id, dimension, "Embedding model loaded");

        Ok(Self {
            model,
            tokenizer,
            device,
            dimension,
        })
    }

    /// Mean pooling with attention mask
    fn mean_pool(embeddings: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let mask_expanded = attention_mask
            .unsqueeze(2)?
            .expand(embeddings.shape())?
            .to_dtype(embeddings.dtype())?;

        let sum_embeddings = (embeddings * &mask_expanded)?.sum(1)?;
        let sum_mask = mask_expanded.sum(1)?.clamp(1e-9, f64::MAX)?;

        Ok(sum_embeddings.broadcast_div(&sum_mask)?)
    }
}

impl Embedder for BertEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EduBotError::Embedding(format!("Tokenization failed: {}", e)))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);
        let batch_size = encodings.len();

        // Right-pad every sequence to the longest one in the batch.
        let mut flat_ids = vec![0u32; batch_size * max_len];
        let mut flat_mask = vec![0u32; batch_size * max_len];
        for (row, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let start = row * max_len;
            flat_ids[start..start + ids.len()].copy_from_slice(ids);
            flat_mask[start..start + mask.len()].copy_from_slice(mask);
        }

        let token_ids = Tensor::from_vec(flat_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(flat_mask, (batch_size, max_len), &self.device)?;
        let token_type_ids = token_ids.zeros_like()?;

        debug!(batch_size, max_len, "Running embedding forward pass");
        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;

        let pooled = Self::mean_pool(&hidden, &attention_mask)?;
        Ok(pooled.to_vec2::<f32>()?)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
