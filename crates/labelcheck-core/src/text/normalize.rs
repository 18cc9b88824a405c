//! Text cleanup for field search and for comparison.
//!
//! [`preprocess`] prepares extracted document text for the field
//! extractors. [`normalize_then_clean`] canonicalizes a single field value
//! before it is scored. The two are not interchangeable: the first keeps
//! case and line structure, the second destroys both.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SYNTHETIC_MARKER: Regex = Regex::new(
        r"--- (?:Page \d+|Table \d+ on Page \d+|Structured Page \d+) ---"
    ).unwrap();

    static ref HORIZONTAL_SPACE: Regex = Regex::new(r"[ \t\u{a0}\r\x0c\x0b]+").unwrap();

    static ref WINDOWS_PATH: Regex = Regex::new(r"[A-Za-z]:\\[^\\]+\\\S*").unwrap();
    static ref URL: Regex = Regex::new(r"https?://\S+").unwrap();
    static ref WWW: Regex = Regex::new(r"www\.\S+").unwrap();

    static ref DISALLOWED_PUNCT: Regex = Regex::new(r"[^\w\s:/\-.,()%&]").unwrap();
    static ref SLASH_RUN: Regex = Regex::new(r"[/\\]+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    static ref PAGE_NOISE: Regex = Regex::new(r"(?i)\bpage \d+").unwrap();
    static ref TABLE_NOISE: Regex = Regex::new(r"(?i)\btable \d+").unwrap();
    static ref LEADING_NUMBER: Regex = Regex::new(r"^\d+\s*[:|.](?:\s|$)").unwrap();
    static ref LEADING_BULLET: Regex = Regex::new(r"^\s*[-•]\s*").unwrap();
}

/// Values that mean "nothing was extracted".
const EMPTY_MARKERS: [&str; 3] = ["not found", "none", "n/a"];

const EDGE_PUNCT: &[char] = &[',', '.', ';', ':', '-', '/', ' '];

/// Prepare extracted text for field search.
///
/// Removes the page/table/block markers inserted by the extraction
/// backends, collapses horizontal whitespace within each line, and drops
/// blank lines. Line breaks are kept because several extractors read
/// labelled values line by line.
pub fn preprocess(text: &str) -> String {
    let without_markers = SYNTHETIC_MARKER.replace_all(text, "");

    without_markers
        .lines()
        .map(|line| HORIZONTAL_SPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lowercase, strip paths/URLs and stray punctuation, collapse whitespace.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let s = WINDOWS_PATH.replace_all(&lowered, "");
    let s = URL.replace_all(&s, "");
    let s = WWW.replace_all(&s, "");
    let s = DISALLOWED_PUNCT.replace_all(&s, " ");
    let s = SLASH_RUN.replace_all(&s, "/");
    let s = WHITESPACE.replace_all(&s, " ");

    s.trim().to_string()
}

/// Canonical comparison form of a field value.
///
/// Applies [`normalize`], then strips page/table markers and leading
/// bullet or list-number tokens. The decoration-exclusion phrase is kept.
/// Empty markers ("not found", "none", "n/a") clean to the empty string.
///
/// The result is a fixpoint: cleaning it again returns it unchanged.
pub fn normalize_then_clean(text: &str) -> String {
    let mut current = text.to_string();

    // After the first pass every pass only deletes text.
    loop {
        if is_empty_marker(&current) {
            return String::new();
        }

        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(text: &str) -> String {
    let s = normalize(text);
    let s = PAGE_NOISE.replace_all(&s, "");
    let s = TABLE_NOISE.replace_all(&s, "");
    let s = LEADING_NUMBER.replace(&s, "");
    let s = LEADING_BULLET.replace(&s, "");
    let s = WHITESPACE.replace_all(&s, " ");

    s.trim_matches(EDGE_PUNCT).to_string()
}

fn is_empty_marker(text: &str) -> bool {
    let t = text.trim();
    EMPTY_MARKERS.iter().any(|m| t.eq_ignore_ascii_case(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preprocess_strips_markers_and_blank_lines() {
        let raw = "--- Page 1 ---\nProduct  Code:\tLB 5735\n\n\n--- Table 1 on Page 1 ---\nA | B\n--- Structured Page 2 ---\n  tail  ";
        assert_eq!(preprocess(raw), "Product Code: LB 5735\nA | B\ntail");
    }

    #[test]
    fn test_normalize_punctuation_and_case() {
        assert_eq!(normalize("Made In  SRI LANKA!!"), "made in sri lanka");
        assert_eq!(normalize("95% Cotton; 5% Elastane"), "95% cotton 5% elastane");
        assert_eq!(normalize("a//b\\\\c"), "a/b c");
        assert_eq!(normalize("see https://example.com/x now"), "see now");
    }

    #[test]
    fn test_clean_strips_noise_but_keeps_decoration_phrase() {
        assert_eq!(normalize_then_clean("1. Exclusive of Decoration"), "exclusive of decoration");
        assert_eq!(normalize_then_clean("- page 2 M-100"), "m-100");
        assert_eq!(normalize_then_clean("SRI LANKA, "), "sri lanka");
        assert_eq!(normalize_then_clean("Sri Lanka"), "sri lanka");
        assert_eq!(normalize_then_clean("12.50, 7.50"), "12.50, 7.50");
    }

    #[test]
    fn test_clean_empty_markers() {
        assert_eq!(normalize_then_clean("Not found"), "");
        assert_eq!(normalize_then_clean("N/A"), "");
        assert_eq!(normalize_then_clean(""), "");
        assert_eq!(normalize_then_clean("  none "), "");
    }

    #[test]
    fn test_normalize_then_clean_is_idempotent() {
        let samples = [
            "",
            "Not found",
            "SRI LANKA, ",
            "1. 2. 3: nested numbering",
            "- • bullet - list",
            "C:\\Users\\me\\file.pdf attached",
            "HTTP://WWW.EXAMPLE.COM/Path trailing",
            "page 1 table 2 page 3",
            "VSD# 431650 QD4(PO) || VSS# 11276861(PO)",
            "XS-120, S-240, M-12.5",
            "cotton - 95%, elastane - 5%",
            "///\\\\--..,,",
            "12: n/a",
            "Déchets — résumé «ok»",
            "装饰除外",
        ];

        for s in samples {
            let once = normalize_then_clean(s);
            let twice = normalize_then_clean(&once);
            assert_eq!(twice, once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_deeply_nested_numbering_cleans_fully() {
        let deep: String = (1..=20).map(|i| format!("{}. ", i)).collect::<String>() + "x";
        assert_eq!(normalize_then_clean(&deep), "x");

        let mixed: String = (1..=30)
            .map(|i| match i % 4 {
                0 => format!("{}: ", i),
                1 => "- ".to_string(),
                2 => format!("page {} ", i),
                _ => format!("table {} ", i),
            })
            .collect::<String>()
            + "Exclusive of Decoration";
        assert_eq!(normalize_then_clean(&mixed), "exclusive of decoration");

        let ends_empty: String = (1..=25).map(|i| format!("{}. ", i)).collect::<String>() + "n/a";
        assert_eq!(normalize_then_clean(&ends_empty), "");

        for s in [deep, mixed, ends_empty] {
            let once = normalize_then_clean(&s);
            assert_eq!(normalize_then_clean(&once), once, "not idempotent for {:?}", s);
        }
    }
}
