//! Raw content-stream text decoding.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

/// TJ adjustment (thousandths of an em) treated as a word gap.
const KERNING_SPACE_THRESHOLD: f64 = -100.0;

/// Decode the operand of a text-showing operator.
///
/// Literal strings are tried as UTF-8, then UTF-16BE when they carry a BOM,
/// then Latin-1. TJ arrays insert a space for large negative kerning.
pub fn decode_text_operand(operand: &Object) -> Option<String> {
    match operand {
        Object::String(bytes, _) => Some(decode_bytes(bytes)),
        Object::Array(items) => {
            let mut text = String::new();
            for item in items {
                match item {
                    Object::String(bytes, _) => text.push_str(&decode_bytes(bytes)),
                    Object::Integer(n) if (*n as f64) < KERNING_SPACE_THRESHOLD => text.push(' '),
                    Object::Real(n) if (*n as f64) < KERNING_SPACE_THRESHOLD => text.push(' '),
                    _ => {}
                }
            }
            Some(text)
        }
        _ => None,
    }
}

fn decode_bytes(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        if let Ok(s) = String::from_utf16(&units) {
            return s;
        }
    }
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// Decoded operations of one page, or `None` if the stream is unreadable.
fn page_operations(doc: &Document, page_id: ObjectId) -> Option<Content> {
    let raw = doc.get_page_content(page_id).ok()?;
    Content::decode(&raw).ok()
}

/// Text grouped by `BT`/`ET` block, one string per non-empty block.
///
/// Line-moving operators inside a block start a new line.
pub fn page_text_blocks(doc: &Document, page_id: ObjectId) -> Vec<String> {
    let Some(content) = page_operations(doc, page_id) else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    let mut current = String::new();

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => current.clear(),
            "ET" => {
                let block = current.trim();
                if !block.is_empty() {
                    blocks.push(block.to_string());
                }
                current.clear();
            }
            "Td" | "TD" | "T*" => push_newline(&mut current),
            "'" | "\"" => {
                push_newline(&mut current);
                if let Some(text) = op.operands.last().and_then(decode_text_operand) {
                    current.push_str(&text);
                }
            }
            "Tj" | "TJ" => {
                for operand in &op.operands {
                    if let Some(text) = decode_text_operand(operand) {
                        current.push_str(&text);
                    }
                }
            }
            _ => {}
        }
    }

    blocks
}

/// Concatenated text-showing operands of one page, newline per text line.
pub fn page_raw_text(doc: &Document, page_id: ObjectId) -> String {
    page_text_blocks(doc, page_id).join("\n")
}

fn push_newline(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_literal_and_utf16() {
        let latin = Object::String(b"Care Code".to_vec(), StringFormat::Literal);
        assert_eq!(decode_text_operand(&latin).as_deref(), Some("Care Code"));

        let utf16 = Object::String(vec![0xFE, 0xFF, 0x00, 0x4D, 0x00, 0x57], StringFormat::Hexadecimal);
        assert_eq!(decode_text_operand(&utf16).as_deref(), Some("MW"));

        let latin1 = Object::String(vec![0x63, 0x6F, 0x74, 0xF3, 0x6E], StringFormat::Literal);
        assert_eq!(decode_text_operand(&latin1).as_deref(), Some("cotón"));
    }

    #[test]
    fn test_decode_tj_array_kerning() {
        let arr = Object::Array(vec![
            Object::String(b"Made".to_vec(), StringFormat::Literal),
            Object::Integer(-250),
            Object::String(b"in".to_vec(), StringFormat::Literal),
            Object::Integer(-20),
            Object::String(b"SL".to_vec(), StringFormat::Literal),
        ]);
        assert_eq!(decode_text_operand(&arr).as_deref(), Some("Made inSL"));
    }

    #[test]
    fn test_non_text_operand() {
        assert_eq!(decode_text_operand(&Object::Integer(3)), None);
    }
}
