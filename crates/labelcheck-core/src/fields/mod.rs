//! Field extraction from WO/PO text.
//!
//! Each field is located by ordered regex patterns and a few structural
//! heuristics. Extractors never fail: a field that cannot be found is left
//! missing and rendered as `"Not found"`.

pub mod codes;
pub mod composition;
pub mod descriptive;
mod extractor;
pub mod patterns;
pub mod sizes;

pub use codes::VsdCodes;
pub use extractor::{extract_fields, FieldSetExtractor, PurchaseOrderExtractor, WorkOrderExtractor};

use regex::Regex;

/// First capture group of the first matching pattern, trimmed.
pub(crate) fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase the first letter of each word and lowercase the rest.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("LACE BIKINI"), "Lace Bikini");
        assert_eq!(title_case("viet nam"), "Viet Nam");
        assert_eq!(title_case("hi-cut/brief"), "Hi-Cut/Brief");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n c "), "a b c");
    }
}
