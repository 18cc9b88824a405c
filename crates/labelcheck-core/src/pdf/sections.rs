//! Splitting backend output back into one rendition per page.
//!
//! The structured backend appends detected tables after each page and the
//! layout backend follows each plain page with a block pass. Both repeat
//! page content, so anything that sums quantities must read only one
//! rendition of every page.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SECTION_HEADER: Regex = Regex::new(
        r"^---\s+(Page|Structured Page|Table \d+ on Page)\s+(\d+)\s+---$"
    ).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Plain,
    Structured,
    Table,
}

#[derive(Debug, Default)]
struct PageRenditions<'a> {
    /// Page number from the header; 0 for text before any header.
    number: usize,
    plain: Vec<&'a str>,
    structured: Vec<&'a str>,
}

impl<'a> PageRenditions<'a> {
    /// The plain pass, unless the block pass kept more lines.
    fn chosen(&self) -> &[&'a str] {
        if non_empty(&self.plain) >= non_empty(&self.structured) {
            &self.plain
        } else {
            &self.structured
        }
    }
}

fn non_empty(lines: &[&str]) -> usize {
    lines.iter().filter(|l| !l.trim().is_empty()).count()
}

/// Page text with table appendices dropped and a single rendition kept
/// per page.
///
/// `--- Page N ---` headers are preserved. Text without headers comes back
/// line for line.
pub fn primary_text(text: &str) -> String {
    let mut pages: Vec<PageRenditions<'_>> = vec![PageRenditions::default()];
    let mut current = 0;
    let mut section = Section::Plain;

    for line in text.lines() {
        if let Some(caps) = SECTION_HEADER.captures(line.trim()) {
            section = match &caps[1] {
                "Page" => Section::Plain,
                "Structured Page" => Section::Structured,
                _ => Section::Table,
            };
            if section == Section::Table {
                continue;
            }

            let number: usize = caps[2].parse().unwrap_or(0);
            current = match pages.iter().position(|p| p.number == number) {
                Some(idx) => idx,
                None => {
                    pages.push(PageRenditions {
                        number,
                        ..Default::default()
                    });
                    pages.len() - 1
                }
            };
            continue;
        }

        match section {
            Section::Plain => pages[current].plain.push(line),
            Section::Structured => pages[current].structured.push(line),
            Section::Table => {}
        }
    }

    let mut out: Vec<String> = Vec::new();
    for page in &pages {
        let lines = page.chosen();
        if page.number == 0 {
            if non_empty(lines) == 0 {
                continue;
            }
        } else {
            out.push(format!("--- Page {} ---", page.number));
        }
        out.extend(lines.iter().map(|l| l.to_string()));
    }

    out.join("\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_appendix_is_dropped() {
        let text = "10 LB5735 1 5.00 PCS   EUR 1.00
20 LB5736 2 7.00 PCS   EUR 1.00

--- Table 1 on Page 1 ---
10 LB5735 1 5.00 PCS | EUR 1.00
20 LB5736 2 7.00 PCS | EUR 1.00
";
        assert_eq!(
            primary_text(text),
            "10 LB5735 1 5.00 PCS   EUR 1.00\n20 LB5736 2 7.00 PCS   EUR 1.00"
        );
    }

    #[test]
    fn test_structured_output_keeps_page_headers() {
        let text = "--- Page 1 ---
Style No: 5735
a  b
c  d

--- Table 1 on Page 1 ---
a | b
c | d

--- Page 2 ---
tail";
        assert_eq!(
            primary_text(text),
            "--- Page 1 ---\nStyle No: 5735\na  b\nc  d\n\n--- Page 2 ---\ntail"
        );
    }

    #[test]
    fn test_layout_keeps_one_pass_per_page() {
        // Plain pass with line breaks wins ties.
        let text = "--- Page 1 ---
10 LB5735 1 5.00 PCS
x

--- Structured Page 1 ---
10 LB5735 1 5.00 PCS
x
";
        assert_eq!(primary_text(text), "--- Page 1 ---\n10 LB5735 1 5.00 PCS\nx");

        // A plain pass flattened onto one line loses to the block pass.
        let flat = "--- Page 1 ---
10 LB5735 1 5.00 PCS Label care Destination GB

--- Structured Page 1 ---
10 LB5735 1 5.00 PCS
Label care
Destination GB
";
        assert_eq!(
            primary_text(flat),
            "--- Page 1 ---\n10 LB5735 1 5.00 PCS\nLabel care\nDestination GB"
        );
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(primary_text("a\nb\n"), "a\nb");
        assert_eq!(primary_text(""), "");
    }
}
