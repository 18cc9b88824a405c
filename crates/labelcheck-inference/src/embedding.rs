//! Sentence embeddings: tokenizer + encoder + mean pooling.

use std::path::{Path, PathBuf};

use tokenizers::tokenizer::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

use crate::backend::ort::OrtBackend;
use crate::error::InferenceError;
use crate::tensor::InputTensor;
use crate::{InferenceBackend, Result};

/// Anything that can turn a string into a fixed-size embedding vector.
///
/// The comparator only depends on this trait, which keeps it testable with a
/// stub provider and no model on disk.
pub trait EmbeddingProvider: Send + Sync {
    /// Human-readable model identifier (used in logs).
    fn name(&self) -> &str;

    /// Embed a single string. Returned vectors are L2-normalised.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Where and how to load a sentence-embedding model.
#[derive(Debug, Clone)]
pub struct EmbedderOptions {
    /// ONNX model file name inside a model directory.
    pub model_file: String,
    /// `tokenizer.json` file name inside a model directory.
    pub tokenizer_file: String,
    /// Maximum number of tokens fed to the encoder.
    pub max_sequence_length: usize,
    /// Intra-op threads for ONNX Runtime.
    pub intra_threads: usize,
}

impl Default for EmbedderOptions {
    fn default() -> Self {
        Self {
            model_file: "model.onnx".to_string(),
            tokenizer_file: "tokenizer.json".to_string(),
            max_sequence_length: 256,
            intra_threads: 4,
        }
    }
}

/// Transformer sentence embedder (all-MiniLM / all-mpnet style exports).
pub struct SentenceEmbedder {
    name: String,
    backend: Box<dyn InferenceBackend>,
    tokenizer: Tokenizer,
}

impl SentenceEmbedder {
    /// Load the model and tokenizer from one directory.
    pub fn load(dir: &Path, options: &EmbedderOptions) -> Result<Self> {
        let model_path = dir.join(&options.model_file);
        let tokenizer_path = dir.join(&options.tokenizer_file);

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| InferenceError::Tokenizer(format!("{}: {}", tokenizer_path.display(), e)))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: options.max_sequence_length,
                ..Default::default()
            }))
            .map_err(|e| InferenceError::Tokenizer(e.to_string()))?;
        // Single-sentence batches never need padding.
        tokenizer.with_padding(None);

        let backend = OrtBackend::from_file(&model_path, options.intra_threads)?;

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        info!("Loaded embedding model '{}' from {}", name, dir.display());

        Ok(Self::with_backend(name, Box::new(backend), tokenizer))
    }

    /// Try each search path in order and return the first model that loads.
    pub fn load_first(paths: &[PathBuf], options: &EmbedderOptions) -> Result<Self> {
        for dir in paths {
            let has_files = dir.join(&options.model_file).is_file()
                && dir.join(&options.tokenizer_file).is_file();
            if !has_files {
                debug!("No embedding model at {}", dir.display());
                continue;
            }

            match Self::load(dir, options) {
                Ok(embedder) => return Ok(embedder),
                Err(e) => warn!("Failed to load embedding model from {}: {}", dir.display(), e),
            }
        }

        Err(InferenceError::ModelNotFound {
            searched: paths.to_vec(),
        })
    }

    /// Assemble an embedder from an already-constructed backend.
    pub fn with_backend(name: impl Into<String>, backend: Box<dyn InferenceBackend>, tokenizer: Tokenizer) -> Self {
        Self {
            name: name.into(),
            backend,
            tokenizer,
        }
    }
}

impl EmbeddingProvider for SentenceEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| InferenceError::Tokenizer(e.to_string()))?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&v| v as i64).collect();
        let mask: Vec<i64> = encoding.get_attention_mask().iter().map(|&v| v as i64).collect();
        let type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&v| v as i64).collect();
        let seq_len = ids.len();
        if seq_len == 0 {
            return Err(InferenceError::InvalidInput("empty token sequence".to_string()));
        }

        let mut inputs: Vec<(&str, InputTensor)> = Vec::with_capacity(3);
        for name in self.backend.input_names() {
            let data = match name.as_str() {
                "input_ids" => ids.clone(),
                "attention_mask" => mask.clone(),
                "token_type_ids" => type_ids.clone(),
                other => {
                    return Err(InferenceError::InvalidInput(format!(
                        "unexpected model input '{}'",
                        other
                    )))
                }
            };
            inputs.push((name.as_str(), InputTensor::from_i64(data, &[1, seq_len])?));
        }

        let outputs = self.backend.run(&inputs)?;

        let (_, hidden) = outputs
            .iter()
            .find(|(name, _)| name == "sentence_embedding")
            .or_else(|| outputs.iter().find(|(name, _)| name == "last_hidden_state"))
            .or_else(|| outputs.first())
            .ok_or_else(|| InferenceError::OutputExtraction("model produced no outputs".to_string()))?;

        let hidden = hidden
            .as_f32()
            .ok_or_else(|| InferenceError::OutputExtraction("expected a float output".to_string()))?;

        let pooled = match hidden.shape() {
            // Already pooled: [batch, dim]
            [1, _] => hidden.iter().copied().collect(),
            // Token embeddings: [batch, seq, dim]
            [1, tokens, dim] if *tokens == seq_len => {
                let flat: Vec<f32> = hidden.iter().copied().collect();
                mean_pool(&flat, &mask, *dim)
            }
            shape => {
                return Err(InferenceError::OutputExtraction(format!(
                    "unexpected output shape {:?}",
                    shape
                )))
            }
        };

        if pooled.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::OutputExtraction(
                "embedding contains non-finite values".to_string(),
            ));
        }

        Ok(l2_normalize(&pooled))
    }
}

/// Average token embeddings, counting only positions where the mask is set.
fn mean_pool(token_embeddings: &[f32], mask: &[i64], dim: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; dim];
    let mut count = 0.0f32;

    for (t, &m) in mask.iter().enumerate() {
        if m == 0 {
            continue;
        }
        let row = &token_embeddings[t * dim..(t + 1) * dim];
        for (acc, v) in pooled.iter_mut().zip(row) {
            *acc += v;
        }
        count += 1.0;
    }

    if count > 0.0 {
        for v in pooled.iter_mut() {
            *v /= count;
        }
    }
    pooled
}

fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm.is_finite() && norm > 1e-10 {
        v.iter().map(|x| x / norm).collect()
    } else {
        vec![0.0; v.len()]
    }
}

/// Cosine similarity of two vectors, in `[-1, 1]`. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na <= 1e-10 || nb <= 1e-10 {
        return 0.0;
    }
    (dot / (na * nb)).clamp(-1.0, 1.0)
}
