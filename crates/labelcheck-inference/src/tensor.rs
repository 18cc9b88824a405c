//! Tensor types for inference input/output.

use ndarray::{ArrayD, IxDyn};

use crate::error::InferenceError;
use crate::Result;

/// Input tensor for inference.
///
/// Transformer encoders only take integer token ids and masks.
#[derive(Debug, Clone)]
pub enum InputTensor {
    Int64(ArrayD<i64>),
}

impl InputTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        let InputTensor::Int64(arr) = self;
        arr.shape()
    }

    /// Create an Int64 tensor from raw data and shape.
    pub fn from_i64(data: Vec<i64>, shape: &[usize]) -> Result<Self> {
        ArrayD::from_shape_vec(IxDyn(shape), data)
            .map(InputTensor::Int64)
            .map_err(|e| InferenceError::InvalidInput(e.to_string()))
    }
}

/// Output tensor from inference.
#[derive(Debug, Clone)]
pub enum OutputTensor {
    Float32(ArrayD<f32>),
    Int64(ArrayD<i64>),
}

impl OutputTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        match self {
            OutputTensor::Float32(arr) => arr.shape(),
            OutputTensor::Int64(arr) => arr.shape(),
        }
    }

    /// Try to get the inner Float32 array.
    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            OutputTensor::Float32(arr) => Some(arr),
            _ => None,
        }
    }
}
