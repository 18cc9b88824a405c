//! Inference backend implementations.

pub mod ort;

use crate::{InputTensor, OutputTensor, Result};

/// Trait for ONNX inference backends.
///
/// The embedder only talks to this trait, so a session can be swapped for
/// anything that maps named inputs to named outputs.
pub trait InferenceBackend: Send + Sync {
    /// Run inference with the given named inputs.
    fn run(&self, inputs: &[(&str, InputTensor)]) -> Result<Vec<(String, OutputTensor)>>;

    /// Get the input names expected by the model.
    fn input_names(&self) -> &[String];

    /// Get the output names produced by the model.
    fn output_names(&self) -> &[String];
}
