//! MIME message walking: body text and PDF attachments.

use mailparse::{DispositionType, ParsedMail};
use tracing::{debug, warn};

use crate::error::EmailError;

/// A PDF attached to an email.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfAttachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Body and PDF attachments of one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailContent {
    /// Last inline `text/html` or `text/plain` part, decoded.
    pub body: Option<String>,
    /// Named `application/pdf` attachments, in message order.
    pub pdf_attachments: Vec<PdfAttachment>,
}

/// Parse an `.eml` byte stream.
///
/// Every inline text part overwrites the body, so in a
/// `multipart/alternative` message the HTML rendition usually wins.
/// Attached PDFs without a filename are ignored.
pub fn extract_email_content(raw: &[u8]) -> Result<EmailContent, EmailError> {
    let mail = mailparse::parse_mail(raw).map_err(|e| EmailError::Parse(e.to_string()))?;
    let mut content = EmailContent::default();

    if mail.subparts.is_empty() {
        if is_text(&mail) {
            content.body = Some(decode_text(&mail));
        }
    } else {
        walk(&mail, &mut content)?;
    }

    debug!(
        has_body = content.body.is_some(),
        attachments = content.pdf_attachments.len(),
        "parsed email"
    );
    Ok(content)
}

fn walk(part: &ParsedMail<'_>, content: &mut EmailContent) -> Result<(), EmailError> {
    let disposition = part.get_content_disposition();

    if matches!(disposition.disposition, DispositionType::Inline) {
        if is_text(part) {
            content.body = Some(decode_text(part));
        }
    } else if part.ctype.mimetype.eq_ignore_ascii_case("application/pdf") {
        let filename = disposition
            .params
            .get("filename")
            .or_else(|| part.ctype.params.get("name"))
            .cloned();

        if let Some(filename) = filename {
            let data = part.get_body_raw().map_err(|e| EmailError::Decode {
                part: filename.clone(),
                reason: e.to_string(),
            })?;
            content.pdf_attachments.push(PdfAttachment { filename, data });
        }
    }

    for sub in &part.subparts {
        walk(sub, content)?;
    }
    Ok(())
}

fn is_text(part: &ParsedMail<'_>) -> bool {
    let mime = part.ctype.mimetype.to_ascii_lowercase();
    mime == "text/plain" || mime == "text/html"
}

/// Decode with the declared charset, falling back to lossy UTF-8.
fn decode_text(part: &ParsedMail<'_>) -> String {
    match part.get_body() {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to decode {} body: {}", part.ctype.mimetype, e);
            part.get_body_raw()
                .map(|raw| String::from_utf8_lossy(&raw).into_owned())
                .unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MULTIPART: &str = "From: buyer@example.com\r
To: factory@example.com\r
Subject: PO 4500123\r
MIME-Version: 1.0\r
Content-Type: multipart/mixed; boundary=\"outer\"\r
\r
--outer\r
Content-Type: multipart/alternative; boundary=\"inner\"\r
\r
--inner\r
Content-Type: text/plain; charset=utf-8\r
\r
COO: SRI LANKA\r
--inner\r
Content-Type: text/html; charset=utf-8\r
\r
<p>COO: SRI LANKA</p>\r
--inner--\r
--outer\r
Content-Type: application/pdf; name=\"po.pdf\"\r
Content-Disposition: attachment; filename=\"po.pdf\"\r
Content-Transfer-Encoding: base64\r
\r
JVBERi0xLjQK\r
--outer\r
Content-Type: application/pdf\r
Content-Disposition: attachment\r
Content-Transfer-Encoding: base64\r
\r
JVBERi0xLjQK\r
--outer--\r
";

    #[test]
    fn test_multipart_body_and_attachments() {
        let content = extract_email_content(MULTIPART.as_bytes()).unwrap();

        assert_eq!(content.body.as_deref().map(str::trim), Some("<p>COO: SRI LANKA</p>"));
        assert_eq!(content.pdf_attachments.len(), 1);
        assert_eq!(content.pdf_attachments[0].filename, "po.pdf");
        assert_eq!(content.pdf_attachments[0].data, b"%PDF-1.4\n".to_vec());
    }

    #[test]
    fn test_single_part_plain_text() {
        let raw = b"Subject: hi\r\nContent-Type: text/plain\r\n\r\nFactory Code: ABC123\r\n";
        let content = extract_email_content(raw).unwrap();
        assert_eq!(content.body.as_deref().map(str::trim), Some("Factory Code: ABC123"));
        assert!(content.pdf_attachments.is_empty());
    }

    #[test]
    fn test_single_part_pdf_has_no_body() {
        let raw = b"Content-Type: application/pdf\r\n\r\n%PDF";
        let content = extract_email_content(raw).unwrap();
        assert_eq!(content, EmailContent::default());
    }
}
