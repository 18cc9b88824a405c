//! Email-to-PDF assembly: a generated cover page followed by the
//! message's PDF attachments.

mod cover;
mod merge;

pub use cover::{build_cover_page, CoverDocument};
pub use merge::{merge_attachments, MergedPdf};

use serde::Serialize;
use tracing::info;

use crate::email::{extract_email_content, extract_email_fields, extract_email_tables, EmailFields, EmailTables};
use crate::Result;

/// Everything merge mode produces for one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledEmail {
    pub fields: EmailFields,
    pub tables: EmailTables,
    /// Attachments whose pages follow the cover, in order.
    pub merged: Vec<String>,
    /// Attachments that could not be read.
    pub skipped: Vec<String>,
    pub page_count: usize,
    #[serde(skip)]
    pub pdf: Vec<u8>,
}

/// Parse a raw `.eml` message and produce the merged PDF.
pub fn assemble_email_pdf(raw_email: &[u8]) -> Result<AssembledEmail> {
    let content = extract_email_content(raw_email)?;
    let body = content.body.as_deref();

    let fields = extract_email_fields(body);
    let tables = extract_email_tables(body);
    info!(
        coo = fields.country_of_origin.is_some(),
        factory = fields.factory_code.is_some(),
        attachments = content.pdf_attachments.len(),
        "extracted email data"
    );

    let cover = build_cover_page(&fields, &tables)?;
    let merged = merge_attachments(cover, &content.pdf_attachments)?;

    Ok(AssembledEmail {
        fields,
        tables,
        merged: merged.merged,
        skipped: merged.skipped,
        page_count: merged.page_count,
        pdf: merged.bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_email_gives_cover_only() {
        let raw = b"Subject: PO\r\nContent-Type: text/plain\r\n\r\nCOO: SRI LANKA\r\nFactory Code: 36013779\r\n";
        let assembled = assemble_email_pdf(raw).unwrap();

        assert_eq!(assembled.fields.country_of_origin.as_deref(), Some("SRI LANKA"));
        assert_eq!(assembled.fields.factory_code.as_deref(), Some("36013779"));
        assert_eq!(assembled.page_count, 1);
        assert!(assembled.merged.is_empty());
        assert!(assembled.pdf.starts_with(b"%PDF"));
    }
}
