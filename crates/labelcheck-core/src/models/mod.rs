//! Data models and configuration.

pub mod config;
pub mod document;

pub use config::{ComparisonConfig, ExtractionConfig, LabelCheckConfig, ModelConfig};
pub use document::{
    DocumentKind, ExtractionInfo, ExtractionMethod, ExtractionQuality, ExtractionResult,
    FieldName, FieldSet, PoLineItem, NOT_FOUND,
};
