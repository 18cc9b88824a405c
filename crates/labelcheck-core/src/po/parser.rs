//! PO line-item parsing and quantity aggregation.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use crate::models::PoLineItem;
use crate::pdf::primary_text;
use crate::text::preprocess;

lazy_static! {
    static ref TAG_ITEM_LINE: Regex = Regex::new(
        r"^(\d+)\s+TAG\.PRC\.TKT_.*?([\d,]+\.\d+)\s+PCS"
    ).unwrap();

    static ref ORIGINAL_ITEM_LINE: Regex = Regex::new(
        r"^(\d+)\s+([A-Z0-9]+)\s+(\d+)\s+([\d,]+\.\d+)\s+PCS"
    ).unwrap();

    static ref TAG_PRODUCT: Regex = Regex::new(r"TAG\.PRC\.TKT_(.*?)_REG").unwrap();

    static ref SUPPLIER_REF: Regex = Regex::new(
        r"(?i)Sup\.?\s*Ref\.?\s*[:\-]?\s*([A-Z]+[-\s]?\d+)"
    ).unwrap();

    static ref STYLE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)Style\s*No\.?\s*[:\-]?\s*([A-Z0-9\-]+)").unwrap(),
        Regex::new(r"(?i)Item\s*Style\s*[:\-]?\s*([A-Z0-9\-]+)").unwrap(),
        Regex::new(r"(?i)Style\s*[:\-]?\s*([A-Z0-9\-]+)").unwrap(),
    ];

    static ref SIZE_KEYWORD: Regex = Regex::new(
        r"(?i)\b(XS|S|M|L|XL|XXL|XXXL|XXG|P|G)\b"
    ).unwrap();
}

const TAG_MARKER: &str = "TAG.PRC.TKT_";
const TAG_CSD_LABEL: &str = "Color/Size/Destination :";
const ORIGINAL_CSD_LABEL: &str = "Colour/Size/Destination:";
const SECOND_PAGE_MARKER: &str = "--- Page 2 ---";

/// Sizes accepted from the fixed-offset size line.
const VALID_SIZES: [&str; 8] = ["XXS", "XS", "S", "M", "L", "XL", "XXL", "XXXL"];

/// Sizes searched for on the colour/size/destination line, in priority order.
const SIZE_KEYWORDS: [&str; 10] = ["XS", "S", "M", "L", "XL", "XXL", "XXXL", "XXG", "P", "G"];

/// Lines scanned after a tag-format item for its colour/size line.
const TAG_SCAN_LINES: usize = 5;
/// Lines scanned after an original-format item for its colour/size line.
const ORIGINAL_SCAN_LINES: usize = 10;
/// Offset from an original-format item line to its size line.
const SIZE_LINE_OFFSET: usize = 3;

/// Known PO layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoLayout {
    /// Ticket items with a `Color/Size/Destination :` label.
    Tag,
    /// Four-column items with a `Colour/Size/Destination:` label.
    Original,
}

/// Decide which layout a PO text uses.
///
/// The tag layout wins only when none of the original layout's markers is
/// present.
pub fn detect_layout(text: &str) -> PoLayout {
    let has_tag = text.contains(TAG_MARKER) && text.contains(TAG_CSD_LABEL);
    let has_original = text.contains(ORIGINAL_CSD_LABEL) || SUPPLIER_REF.is_match(text);

    if has_tag && !has_original {
        PoLayout::Tag
    } else {
        PoLayout::Original
    }
}

/// Style number from the first page, uppercased.
///
/// More specific labels are tried before the bare `Style` label so that
/// `Style No: 12345` does not yield `NO`.
pub fn extract_style_number(first_page: &str) -> Option<String> {
    STYLE_PATTERNS.iter().find_map(|re| {
        re.captures(first_page)
            .map(|caps| caps[1].trim().to_uppercase())
            .filter(|s| !s.is_empty())
    })
}

/// Size token immediately before the last `/` on a line, if it is a valid size.
pub fn size_from_line(line: &str) -> Option<String> {
    let (before, _) = line.rsplit_once('/')?;
    let candidate = before.split_whitespace().last()?.to_uppercase();
    VALID_SIZES.contains(&candidate.as_str()).then_some(candidate)
}

/// Parse and aggregate the line items of a PO.
///
/// `text` is the raw extracted text; page markers are tolerated and table
/// appendices or repeated page passes are ignored, so each printed row is
/// counted once. Items sharing (size, colour, style) are merged by summing
/// quantities.
pub fn parse_line_items(text: &str) -> Vec<PoLineItem> {
    let text = primary_text(text);
    let first_page = text.split(SECOND_PAGE_MARKER).next().unwrap_or_default();
    let style = extract_style_number(first_page).unwrap_or_default();

    let cleaned = preprocess(&text);
    let lines: Vec<&str> = cleaned.lines().collect();

    let layout = detect_layout(&cleaned);
    debug!("PO layout: {:?}, style: {:?}", layout, style);

    let items = match layout {
        PoLayout::Tag => parse_tag_layout(&cleaned, &lines, &style),
        PoLayout::Original => parse_original_layout(&cleaned, &lines, &style),
    };

    info!("Parsed {} PO line item(s)", items.len());
    items
}

fn parse_tag_layout(text: &str, lines: &[&str], style: &str) -> Vec<PoLineItem> {
    let product_code = TAG_PRODUCT
        .captures(text)
        .map(|caps| caps[1].trim().to_uppercase().replace('-', " "))
        .unwrap_or_default();

    let mut items = ItemAggregator::default();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = TAG_ITEM_LINE.captures(line) else {
            continue;
        };
        let quantity = parse_quantity(&caps[2]);

        let mut colour = String::new();
        let mut size = String::new();
        if let Some(csd) = scan_for_label(lines, i, TAG_SCAN_LINES, TAG_CSD_LABEL) {
            let parts: Vec<&str> = csd.split(" / ").map(str::trim).filter(|p| !p.is_empty()).collect();
            if parts.len() >= 2 {
                colour = parts[0].split_whitespace().next().unwrap_or_default().to_string();
                size = parts[1].to_uppercase();
            }
        }

        items.add(PoLineItem {
            item_number: caps[1].to_string(),
            item_code: format!("TAG_{}", product_code),
            quantity,
            colour_code: colour.to_uppercase(),
            size,
            style: style.to_string(),
            product_code: product_code.clone(),
        });
    }

    items.into_items()
}

fn parse_original_layout(text: &str, lines: &[&str], style: &str) -> Vec<PoLineItem> {
    let supplier_ref = SUPPLIER_REF
        .captures(text)
        .map(|caps| caps[1].trim().to_uppercase().replace('-', " "))
        .unwrap_or_default();

    let product_code = if supplier_ref.is_empty() {
        description_tag_code(lines).unwrap_or_default()
    } else {
        supplier_ref
    };

    let mut items = ItemAggregator::default();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = ORIGINAL_ITEM_LINE.captures(line) else {
            continue;
        };
        let quantity = parse_quantity(&caps[4]);

        let mut size = lines
            .get(i + SIZE_LINE_OFFSET)
            .and_then(|l| size_from_line(l))
            .unwrap_or_default();
        let mut colour = String::new();

        if let Some(csd) = scan_for_label(lines, i, ORIGINAL_SCAN_LINES, ORIGINAL_CSD_LABEL) {
            let parts: Vec<&str> = csd.split('/').map(str::trim).filter(|p| !p.is_empty()).collect();
            if let Some(first) = parts.first() {
                colour = first.split_whitespace().next().unwrap_or_default().to_uppercase();

                if size.is_empty() {
                    size = size_from_parts(&parts).unwrap_or_default();
                }
            }
            if size.is_empty() {
                if let Some(m) = SIZE_KEYWORD.captures(csd) {
                    size = m[1].to_uppercase();
                }
            }
        }

        items.add(PoLineItem {
            item_number: caps[1].to_string(),
            item_code: caps[2].to_string(),
            quantity,
            colour_code: colour,
            size: size.trim().to_uppercase(),
            style: style.to_string(),
            product_code: product_code.clone(),
        });
    }

    items.into_items()
}

/// TAG code on the second line after the `Item Description` header.
fn description_tag_code(lines: &[&str]) -> Option<String> {
    let idx = lines.iter().position(|l| l.contains("Item Description"))?;
    let line = lines.get(idx + 2)?;
    TAG_PRODUCT
        .captures(line)
        .map(|caps| caps[1].trim().to_uppercase().replace('-', " "))
}

fn size_from_parts(parts: &[&str]) -> Option<String> {
    let head = parts
        .first()?
        .split('|')
        .next()
        .unwrap_or_default()
        .trim()
        .to_uppercase();
    if SIZE_KEYWORDS.contains(&head.as_str()) {
        return Some(head);
    }

    parts.iter().find_map(|part| {
        let upper = part.to_uppercase();
        SIZE_KEYWORDS
            .iter()
            .find(|kw| upper.contains(*kw))
            .map(|kw| kw.to_string())
    })
}

/// Value after `label` on one of the `window - 1` lines following `start`.
fn scan_for_label<'a>(lines: &[&'a str], start: usize, window: usize, label: &str) -> Option<&'a str> {
    let end = (start + window).min(lines.len());
    lines
        .get(start + 1..end)?
        .iter()
        .copied()
        .find(|l| l.contains(label))
        .and_then(|l| l.split_once(':'))
        .map(|(_, value)| value.trim())
}

fn parse_quantity(raw: &str) -> f64 {
    raw.replace(',', "").parse().unwrap_or(0.0)
}

/// Insertion-ordered aggregation keyed by (size, colour, style).
#[derive(Default)]
struct ItemAggregator {
    items: Vec<PoLineItem>,
    index: HashMap<(String, String, String), usize>,
}

impl ItemAggregator {
    fn add(&mut self, item: PoLineItem) {
        match self.index.get(&item.key()) {
            Some(&idx) => self.items[idx].quantity += item.quantity,
            None => {
                self.index.insert(item.key(), self.items.len());
                self.items.push(item);
            }
        }
    }

    fn into_items(self) -> Vec<PoLineItem> {
        self.items
    }
}
