//! The three text-extraction backends, strongest first.

use tracing::{debug, trace};

use super::content::{page_raw_text, page_text_blocks};
use super::loader::LoadedPdf;
use super::tables::detect_tables;
use super::{BackendOutput, Result, TextBackend};
use crate::error::PdfError;
use crate::models::{ExtractionMethod, ExtractionQuality};

/// Per-page text from `pdf-extract` plus detected tables.
///
/// Each table is appended after its page's text as a pipe-delimited block.
#[derive(Debug, Default)]
pub struct StructuredBackend;

impl TextBackend for StructuredBackend {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Structured
    }

    fn quality(&self) -> ExtractionQuality {
        ExtractionQuality::High
    }

    fn extract(&self, data: &[u8]) -> Result<BackendOutput> {
        let pdf = LoadedPdf::load(data)?;
        let pages = pdf_extract::extract_text_from_mem_by_pages(pdf.raw_data())
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let mut sections = Vec::new();
        let mut tables_found = 0;

        for (idx, page_text) in pages.iter().enumerate() {
            let page_num = idx + 1;
            if !page_text.trim().is_empty() {
                sections.push(format!("--- Page {} ---\n{}", page_num, page_text.trim_end()));
            }

            let tables = detect_tables(page_text);
            trace!("Page {}: {} table(s)", page_num, tables.len());
            for (t, table) in tables.iter().enumerate() {
                sections.push(format!(
                    "\n--- Table {} on Page {} ---\n{}\n",
                    t + 1,
                    page_num,
                    table.to_pipe_text()
                ));
            }
            tables_found += tables.len();
        }

        debug!("Structured backend: {} pages, {} tables", pdf.page_count(), tables_found);

        Ok(BackendOutput {
            text: sections.join("\n").trim().to_string(),
            page_count: pdf.page_count(),
            tables_found,
        })
    }
}

/// lopdf plain-text pass followed by a `BT`/`ET` block pass per page.
#[derive(Debug, Default)]
pub struct LayoutBackend;

impl TextBackend for LayoutBackend {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Layout
    }

    fn quality(&self) -> ExtractionQuality {
        ExtractionQuality::Medium
    }

    fn extract(&self, data: &[u8]) -> Result<BackendOutput> {
        let pdf = LoadedPdf::load(data)?;
        let doc = pdf.document();
        let mut sections = Vec::new();

        for (page_num, page_id) in pdf.pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) if !text.trim().is_empty() => {
                    sections.push(format!("--- Page {} ---\n{}", page_num, text.trim_end()));
                }
                Ok(_) => {}
                Err(e) => debug!("Layout backend: page {} plain pass failed: {}", page_num, e),
            }

            let blocks = page_text_blocks(doc, page_id);
            if !blocks.is_empty() {
                sections.push(format!(
                    "\n--- Structured Page {} ---\n{}\n",
                    page_num,
                    blocks.join("\n")
                ));
            }
        }

        Ok(BackendOutput {
            text: sections.join("\n").trim().to_string(),
            page_count: pdf.page_count(),
            tables_found: 0,
        })
    }
}

/// Last resort: raw text-showing operands, page by page.
#[derive(Debug, Default)]
pub struct BasicBackend;

impl TextBackend for BasicBackend {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Basic
    }

    fn quality(&self) -> ExtractionQuality {
        ExtractionQuality::Low
    }

    fn extract(&self, data: &[u8]) -> Result<BackendOutput> {
        let pdf = LoadedPdf::load(data)?;

        let sections: Vec<String> = pdf
            .pages()
            .into_iter()
            .filter_map(|(page_num, page_id)| {
                let text = page_raw_text(pdf.document(), page_id);
                (!text.trim().is_empty()).then(|| format!("--- Page {} ---\n{}", page_num, text))
            })
            .collect();

        Ok(BackendOutput {
            text: sections.join("\n").trim().to_string(),
            page_count: pdf.page_count(),
            tables_found: 0,
        })
    }
}
