//! WO/PO field comparison.

mod comparator;
mod model;
mod pipeline;
mod report;

pub use comparator::{ComparisonRow, FieldComparator, Verdict};
pub use model::shared_embedder;
pub use pipeline::compare_documents;
pub use report::{ComparisonReport, ComparisonSummary, MatchBand};
