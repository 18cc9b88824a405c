//! Core library for WO/PO care-label verification.
//!
//! This crate provides:
//! - PDF text extraction through a fallback chain of backends
//! - Purchase-order line-item parsing and per-field extraction
//! - Lexical + semantic field comparison with graded verdicts
//! - Email field extraction and cover-page + attachment PDF assembly

pub mod assembly;
pub mod comparison;
pub mod email;
pub mod error;
pub mod fields;
pub mod models;
pub mod pdf;
pub mod po;
pub mod text;

pub use assembly::{assemble_email_pdf, AssembledEmail};
pub use comparison::{
    compare_documents, shared_embedder, ComparisonReport, ComparisonRow, ComparisonSummary,
    FieldComparator, MatchBand, Verdict,
};
pub use error::{ConfigError, LabelCheckError, Result};
pub use fields::{extract_fields, PurchaseOrderExtractor, WorkOrderExtractor};
pub use models::{
    DocumentKind, ExtractionInfo, ExtractionResult, FieldName, FieldSet, LabelCheckConfig,
    PoLineItem, NOT_FOUND,
};
pub use pdf::ExtractionChain;
pub use po::parse_line_items;

/// Re-export embedding types.
pub use labelcheck_inference::{EmbeddingProvider, SentenceEmbedder};
