//! PDF loading shared by the text backends.

use lopdf::{Document, ObjectId};
use tracing::debug;

use super::Result;
use crate::error::PdfError;

/// A parsed PDF plus the bytes `pdf-extract` should read.
///
/// Documents encrypted with an empty user password are decrypted on load and
/// re-serialized, so every backend sees plain content streams.
pub struct LoadedPdf {
    document: Document,
    raw_data: Vec<u8>,
}

impl LoadedPdf {
    /// Parse a PDF from memory.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            document
                .decrypt("")
                .map_err(|e| PdfError::Parse(format!("encrypted PDF: {}", e)))?;
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", document.get_pages().len());
        Ok(Self { document, raw_data })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take the parsed document, e.g. to splice its pages elsewhere.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Bytes of the (possibly decrypted) document.
    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page numbers (1-indexed) with their object ids, in page order.
    pub fn pages(&self) -> Vec<(u32, ObjectId)> {
        self.document.get_pages().into_iter().collect()
    }
}
