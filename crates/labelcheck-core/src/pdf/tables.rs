//! Heuristic table detection on extracted page text.
//!
//! A table is a run of at least two consecutive lines that each split into
//! two or more cells on gaps of two or more spaces (or tabs).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CELL_GAP: Regex = Regex::new(r"\t+| {2,}").unwrap();
}

const MIN_ROWS: usize = 2;
const MIN_CELLS: usize = 2;

/// A detected table, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedTable {
    pub rows: Vec<Vec<String>>,
}

impl DetectedTable {
    /// Pipe-delimited rendering, one row per line.
    pub fn to_pipe_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join(" | "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Find table-like regions in one page of text.
pub fn detect_tables(page_text: &str) -> Vec<DetectedTable> {
    let mut tables = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();

    for line in page_text.lines() {
        let cells = split_cells(line);
        if cells.len() >= MIN_CELLS {
            current.push(cells);
        } else {
            flush(&mut current, &mut tables);
        }
    }
    flush(&mut current, &mut tables);

    tables
}

fn split_cells(line: &str) -> Vec<String> {
    CELL_GAP
        .split(line.trim())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn flush(current: &mut Vec<Vec<String>>, tables: &mut Vec<DetectedTable>) {
    if current.len() >= MIN_ROWS {
        tables.push(DetectedTable {
            rows: std::mem::take(current),
        });
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detects_aligned_rows() {
        let text = "Purchase Order 123\nSize    Qty\nS       120\nM       240\nTotal shipped next week";
        let tables = detect_tables(text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].to_pipe_text(), "Size | Qty\nS | 120\nM | 240");
    }

    #[test]
    fn test_single_row_is_not_a_table() {
        let text = "Name    Value\nplain prose line";
        assert!(detect_tables(text).is_empty());
    }
}
