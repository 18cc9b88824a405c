//! Configuration structures for the extraction and comparison pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use labelcheck_inference::EmbedderOptions;

use crate::error::ConfigError;

/// Main configuration for labelcheck.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelCheckConfig {
    /// Text extraction configuration.
    pub extraction: ExtractionConfig,

    /// Field comparison configuration.
    pub comparison: ComparisonConfig,

    /// Embedding model configuration.
    pub models: ModelConfig,
}

/// Quality gates for the text-extraction backend chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum stripped length for the structured backend.
    pub high_quality_min_chars: usize,

    /// Minimum stripped length for the layout backend.
    pub layout_min_chars: usize,

    /// Minimum stripped length for the last-resort backend.
    pub basic_min_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            high_quality_min_chars: 100,
            layout_min_chars: 100,
            basic_min_chars: 50,
        }
    }
}

/// Score blending for the field comparator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Weight of the token-set lexical score.
    pub lexical_weight: f64,

    /// Weight of the embedding cosine score.
    pub semantic_weight: f64,

    /// Render the PO VSD#/VSS# field against the WO codes.
    pub conditional_vsd: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            lexical_weight: 0.3,
            semantic_weight: 0.7,
            conditional_vsd: false,
        }
    }
}

/// Where to find the sentence-embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directories tried in order; the first containing both files wins.
    pub search_paths: Vec<PathBuf>,

    /// ONNX model file name.
    pub model_file: String,

    /// Tokenizer file name.
    pub tokenizer_file: String,

    /// Token limit per encoded field value.
    pub max_sequence_length: usize,

    /// ONNX Runtime intra-op threads.
    pub intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![
                PathBuf::from("models/all-mpnet-base-v2"),
                PathBuf::from("models/all-MiniLM-L6-v2"),
                PathBuf::from("models/paraphrase-MiniLM-L6-v2"),
            ],
            model_file: "model.onnx".to_string(),
            tokenizer_file: "tokenizer.json".to_string(),
            max_sequence_length: 256,
            intra_threads: 4,
        }
    }
}

impl ModelConfig {
    /// Options passed to the embedder loader.
    pub fn embedder_options(&self) -> EmbedderOptions {
        EmbedderOptions {
            model_file: self.model_file.clone(),
            tokenizer_file: self.tokenizer_file.clone(),
            max_sequence_length: self.max_sequence_length,
            intra_threads: self.intra_threads,
        }
    }
}

impl LabelCheckConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
