//! Sentence-embedding layer for labelcheck.
//!
//! This crate wraps ONNX Runtime (`ort`, XNNPACK execution provider) and a
//! HuggingFace `tokenizers` tokenizer into a single [`EmbeddingProvider`]
//! used by the field comparator for semantic similarity.

mod backend;
mod embedding;
mod error;
mod tensor;

pub use backend::InferenceBackend;
pub use backend::ort::OrtBackend;
pub use embedding::{cosine_similarity, EmbedderOptions, EmbeddingProvider, SentenceEmbedder};
pub use error::InferenceError;
pub use tensor::{InputTensor, OutputTensor};

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
