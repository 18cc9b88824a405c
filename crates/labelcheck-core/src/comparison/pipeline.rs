//! WO/PO comparison request.

use tracing::info;

use labelcheck_inference::EmbeddingProvider;

use super::comparator::FieldComparator;
use super::report::{ComparisonReport, ComparisonSummary};
use crate::fields::{FieldSetExtractor, PurchaseOrderExtractor, WorkOrderExtractor};
use crate::models::LabelCheckConfig;
use crate::pdf::ExtractionChain;
use crate::po::parse_line_items;

/// Run one comparison: extract both PDFs, parse PO items, extract and
/// score every field.
///
/// Per-backend and per-field failures are absorbed into the report; the
/// embedder must already be loaded.
pub fn compare_documents(
    wo_pdf: &[u8],
    po_pdf: &[u8],
    config: &LabelCheckConfig,
    embedder: &dyn EmbeddingProvider,
) -> ComparisonReport {
    let chain = ExtractionChain::new(&config.extraction);

    let wo = chain.extract_text(wo_pdf);
    let po = chain.extract_text(po_pdf);
    info!(
        "Extracted WO ({} chars, {}) and PO ({} chars, {})",
        wo.raw_text.len(),
        wo.info.quality,
        po.raw_text.len(),
        po.info.quality
    );

    let po_items = parse_line_items(&po.raw_text);

    let wo_fields = WorkOrderExtractor.extract(&wo.raw_text);
    let mut po_extractor = PurchaseOrderExtractor::new(&po_items);
    if config.comparison.conditional_vsd {
        po_extractor = po_extractor.with_work_order(&wo.raw_text);
    }
    let po_fields = po_extractor.extract(&po.raw_text);

    let rows = FieldComparator::new(&config.comparison, embedder).compare(&wo_fields, &po_fields);
    let summary = ComparisonSummary::from_rows(&rows);
    info!(
        "Compared {} fields with '{}': {} matched",
        summary.total_fields,
        embedder.name(),
        summary.matched_fields
    );

    ComparisonReport {
        rows,
        summary,
        wo_fields,
        po_fields,
        po_items,
        wo_extraction: wo.info,
        po_extraction: po.info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::Verdict;
    use crate::models::{ExtractionQuality, FieldName};

    struct UnitEmbedder;

    impl EmbeddingProvider for UnitEmbedder {
        fn name(&self) -> &str {
            "unit"
        }

        fn embed(&self, _text: &str) -> labelcheck_inference::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    #[test]
    fn test_unreadable_documents_still_produce_a_report() {
        let report = compare_documents(b"not a pdf", b"", &LabelCheckConfig::default(), &UnitEmbedder);

        assert_eq!(report.rows.len(), FieldName::ALL.len());
        assert_eq!(report.wo_extraction.quality, ExtractionQuality::Failed);
        assert_eq!(report.po_extraction.quality, ExtractionQuality::Failed);
        assert!(report.po_items.is_empty());

        let factory = &report.rows[4];
        assert_eq!(factory.field, FieldName::FactoryId);
        assert_eq!(factory.verdict, Verdict::BothMissing);
    }
}
