//! PDF text extraction.
//!
//! Three independent [`TextBackend`]s are tried by [`ExtractionChain`] in a
//! fixed order until one produces enough text.

mod backends;
mod chain;
mod content;
mod loader;
mod sections;
mod tables;

pub use backends::{BasicBackend, LayoutBackend, StructuredBackend};
pub use chain::{ExtractionChain, EXTRACTION_FAILED_TEXT};
pub use loader::LoadedPdf;
pub use sections::primary_text;
pub use tables::{detect_tables, DetectedTable};

use crate::error::PdfError;
use crate::models::{ExtractionMethod, ExtractionQuality};

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// What one backend produced for a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendOutput {
    pub text: String,
    pub page_count: usize,
    pub tables_found: usize,
}

/// A single text-extraction strategy.
pub trait TextBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Method reported when this backend's output is accepted.
    fn method(&self) -> ExtractionMethod;

    /// Quality reported when this backend's output is accepted.
    fn quality(&self) -> ExtractionQuality;

    /// Extract the whole document's text.
    fn extract(&self, data: &[u8]) -> Result<BackendOutput>;
}
