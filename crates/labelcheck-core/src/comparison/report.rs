//! Comparison report and summary.

use serde::Serialize;
use std::fmt;

use super::comparator::ComparisonRow;
use crate::models::{ExtractionInfo, FieldSet, PoLineItem};

/// Overall match band of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    /// At least 80% of fields matched.
    Excellent,
    /// At least 60% of fields matched.
    Good,
    Poor,
}

impl fmt::Display for MatchBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchBand::Excellent => "excellent",
            MatchBand::Good => "good",
            MatchBand::Poor => "poor",
        };
        f.write_str(s)
    }
}

/// Matched-field counts for a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub total_fields: usize,
    pub matched_fields: usize,
    pub match_percentage: f64,
    pub band: MatchBand,
}

impl ComparisonSummary {
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        let total_fields = rows.len();
        let matched_fields = rows.iter().filter(|r| r.verdict.is_match()).count();
        let match_percentage = if total_fields == 0 {
            0.0
        } else {
            matched_fields as f64 / total_fields as f64 * 100.0
        };

        let band = if match_percentage >= 80.0 {
            MatchBand::Excellent
        } else if match_percentage >= 60.0 {
            MatchBand::Good
        } else {
            MatchBand::Poor
        };

        Self {
            total_fields,
            matched_fields,
            match_percentage,
            band,
        }
    }
}

/// Everything produced by one WO/PO comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub rows: Vec<ComparisonRow>,
    pub summary: ComparisonSummary,
    pub wo_fields: FieldSet,
    pub po_fields: FieldSet,
    pub po_items: Vec<PoLineItem>,
    pub wo_extraction: ExtractionInfo,
    pub po_extraction: ExtractionInfo,
}

impl ComparisonReport {
    /// Header of the delimited export.
    pub const CSV_HEADER: [&'static str; 5] = ["Field", "WO Value", "PO Value", "Score", "Verdict"];

    /// Rows as export records, in header order.
    pub fn records(&self) -> impl Iterator<Item = [String; 5]> + '_ {
        self.rows.iter().map(|row| {
            [
                row.field.label().to_string(),
                row.wo_value.clone(),
                row.po_value.clone(),
                row.score_display(),
                row.verdict.label().to_string(),
            ]
        })
    }
}
