//! Generated cover page listing the extracted email data.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::email::{EmailFields, EmailTables};
use crate::error::AssemblyError;
use crate::models::NOT_FOUND;

/// US Letter, in points.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// One laid-out line of cover text.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    font: &'static str,
    size: f32,
    text: String,
    /// Extra space above the line.
    gap: f32,
}

impl Line {
    fn new(font: &'static str, size: f32, text: impl Into<String>, gap: f32) -> Self {
        Self {
            font,
            size,
            text: text.into(),
            gap,
        }
    }
}

/// A single-document PDF whose page tree is ready to receive more pages.
pub struct CoverDocument {
    pub(crate) document: Document,
    pub(crate) pages_id: ObjectId,
    pub(crate) page_ids: Vec<ObjectId>,
}

impl CoverDocument {
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }
}

/// Lay out the email fields and tables on one or more Helvetica pages.
pub fn build_cover_page(
    fields: &EmailFields,
    tables: &EmailTables,
) -> Result<CoverDocument, AssemblyError> {
    let lines = layout_lines(fields, tables);

    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();

    let regular_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = document.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let mut page_ids = Vec::new();
    for page_lines in paginate(&lines) {
        let content = Content {
            operations: page_operations(&page_lines),
        };
        let encoded = content
            .encode()
            .map_err(|e| AssemblyError::CoverPage(e.to_string()))?;
        let content_id = document.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        });
        page_ids.push(page_id);
    }

    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    Ok(CoverDocument {
        document,
        pages_id,
        page_ids,
    })
}

fn layout_lines(fields: &EmailFields, tables: &EmailTables) -> Vec<Line> {
    let mut lines = vec![
        Line::new(BOLD, 18.0, "Extracted Email Data", 0.0),
        Line::new(BOLD, 11.0, "Additional Information:", 18.0),
    ];

    for (label, value) in fields.entries() {
        let text = format!("{}: {}", label, value.unwrap_or(NOT_FOUND));
        push_wrapped(&mut lines, REGULAR, 10.0, &text, 6.0);
    }

    for (title, rows) in tables.entries() {
        lines.push(Line::new(BOLD, 11.0, format!("{}:", title), 18.0));
        for (idx, row) in rows.iter().enumerate() {
            let font = if idx == 0 { BOLD } else { REGULAR };
            push_wrapped(&mut lines, font, 8.0, &row.join(" | "), 2.0);
        }
    }

    lines
}

/// Append `text`, wrapped on word boundaries to the printable width.
fn push_wrapped(lines: &mut Vec<Line>, font: &'static str, size: f32, text: &str, gap: f32) {
    // Helvetica averages about half an em per glyph.
    let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / (size * 0.5)) as usize;
    let mut current = String::new();
    let mut first = true;

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(Line::new(font, size, std::mem::take(&mut current), if first { gap } else { 0.0 }));
            first = false;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || first {
        lines.push(Line::new(font, size, current, if first { gap } else { 0.0 }));
    }
}

fn paginate(lines: &[Line]) -> Vec<Vec<(f32, Line)>> {
    let mut pages = Vec::new();
    let mut page = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in lines {
        let advance = line.gap + line.size * 1.3;
        if y - advance < MARGIN && !page.is_empty() {
            pages.push(std::mem::take(&mut page));
            y = PAGE_HEIGHT - MARGIN;
        }
        y -= advance;
        page.push((y, line.clone()));
    }

    if !page.is_empty() {
        pages.push(page);
    }
    pages
}

fn page_operations(lines: &[(f32, Line)]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(lines.len() * 5);
    for (y, line) in lines {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![line.font.into(), line.size.into()]));
        ops.push(Operation::new("Td", vec![MARGIN.into(), (*y).into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(&line.text))]));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

/// Encode for the standard fonts; characters outside Latin-1 become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cover_lists_fields_with_not_found() {
        let fields = EmailFields {
            country_of_origin: Some("SRI LANKA".to_string()),
            factory_code: None,
        };
        let lines = layout_lines(&fields, &EmailTables::default());
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Extracted Email Data",
                "Additional Information:",
                "Country of Origin: SRI LANKA",
                "Factory Code: Not found",
            ]
        );
    }

    #[test]
    fn test_tables_are_listed_after_fields() {
        let tables = EmailTables {
            table_1: Some(vec![vec!["PO".to_string(), "Style".to_string()]]),
            table_2: None,
        };
        let lines = layout_lines(&EmailFields::default(), &tables);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(&texts[4..], &["Table 1:", "PO | Style"]);
    }

    #[test]
    fn test_long_text_wraps() {
        let mut lines = Vec::new();
        let text = "word ".repeat(100);
        push_wrapped(&mut lines, REGULAR, 10.0, &text, 6.0);
        assert!(lines.len() > 1);
        assert_eq!(lines[0].gap, 6.0);
        assert_eq!(lines[1].gap, 0.0);
    }

    #[test]
    fn test_many_lines_paginate() {
        let lines: Vec<Line> = (0..200).map(|i| Line::new(REGULAR, 10.0, i.to_string(), 0.0)).collect();
        let pages = paginate(&lines);
        assert!(pages.len() > 1);
        assert!(pages.iter().flatten().all(|(y, _)| *y >= MARGIN));
    }

    #[test]
    fn test_build_cover_page() {
        let cover = build_cover_page(&EmailFields::default(), &EmailTables::default()).unwrap();
        assert_eq!(cover.page_count(), 1);
        assert_eq!(cover.document.get_pages().len(), 1);
    }

    #[test]
    fn test_win_ansi_replaces_wide_chars() {
        assert_eq!(win_ansi("é棉"), vec![0xE9, b'?']);
    }
}
