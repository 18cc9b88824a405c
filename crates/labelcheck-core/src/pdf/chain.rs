//! Backend fallback chain.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, info, warn};

use super::{BackendOutput, BasicBackend, LayoutBackend, StructuredBackend, TextBackend};
use crate::error::PdfError;
use crate::models::{
    ExtractionConfig, ExtractionInfo, ExtractionMethod, ExtractionQuality, ExtractionResult,
};

/// Text returned when no backend produced usable output.
pub const EXTRACTION_FAILED_TEXT: &str = "Text extraction failed";

struct Stage {
    backend: Box<dyn TextBackend>,
    min_chars: usize,
}

/// Ordered list of backends with their acceptance thresholds.
pub struct ExtractionChain {
    stages: Vec<Stage>,
}

impl ExtractionChain {
    /// Structured, then layout, then basic, gated by the configured lengths.
    pub fn new(config: &ExtractionConfig) -> Self {
        Self::with_backends(vec![
            (Box::new(StructuredBackend), config.high_quality_min_chars),
            (Box::new(LayoutBackend), config.layout_min_chars),
            (Box::new(BasicBackend), config.basic_min_chars),
        ])
    }

    /// Build a chain from explicit backends.
    ///
    /// A backend's output is accepted when its trimmed length is strictly
    /// greater than the paired threshold.
    pub fn with_backends(backends: Vec<(Box<dyn TextBackend>, usize)>) -> Self {
        Self {
            stages: backends
                .into_iter()
                .map(|(backend, min_chars)| Stage { backend, min_chars })
                .collect(),
        }
    }

    /// Extract text, falling back through the backends.
    ///
    /// Never fails: exhaustion yields [`EXTRACTION_FAILED_TEXT`] with
    /// failed quality.
    pub fn extract_text(&self, data: &[u8]) -> ExtractionResult {
        let mut info = ExtractionInfo::default();

        for stage in &self.stages {
            let name = stage.backend.name();
            let output = match run_backend(stage.backend.as_ref(), data) {
                Ok(output) => output,
                Err(e) => {
                    warn!("{} extraction failed: {}", name, e);
                    continue;
                }
            };

            if output.page_count > 0 {
                info.page_count = output.page_count;
            }
            info.tables_found = info.tables_found.max(output.tables_found);

            let len = output.text.trim().chars().count();
            if len > stage.min_chars {
                info.method = stage.backend.method();
                info.quality = stage.backend.quality();
                info!(
                    "Extracted {} chars with {} backend ({} pages, {} tables)",
                    len, name, info.page_count, info.tables_found
                );
                return ExtractionResult {
                    raw_text: output.text,
                    info,
                };
            }

            debug!("{} backend produced {} chars (need > {})", name, len, stage.min_chars);
        }

        warn!("All text extraction backends failed");
        ExtractionResult {
            raw_text: EXTRACTION_FAILED_TEXT.to_string(),
            info: ExtractionInfo {
                method: ExtractionMethod::Failed,
                quality: ExtractionQuality::Failed,
                ..info
            },
        }
    }
}

impl Default for ExtractionChain {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

/// Run a backend, turning a parser panic into an error.
fn run_backend(backend: &dyn TextBackend, data: &[u8]) -> Result<BackendOutput, PdfError> {
    match catch_unwind(AssertUnwindSafe(|| backend.extract(data))) {
        Ok(result) => result,
        Err(_) => Err(PdfError::Panicked {
            backend: backend.name(),
        }),
    }
}
