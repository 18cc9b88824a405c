//! Document-level field extraction.

use tracing::debug;

use super::codes::{self, VsdCodes};
use super::{composition, descriptive, sizes};
use crate::models::{DocumentKind, FieldName, FieldSet, PoLineItem};
use crate::text::preprocess;

/// Extracts the full [`FieldSet`] from one document's text.
pub trait FieldSetExtractor {
    /// Which document kind this extractor handles.
    fn kind(&self) -> DocumentKind;

    /// Extract every field. Fields that cannot be found stay missing.
    fn extract(&self, text: &str) -> FieldSet;
}

/// Field extraction for work orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkOrderExtractor;

impl FieldSetExtractor for WorkOrderExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::WorkOrder
    }

    fn extract(&self, text: &str) -> FieldSet {
        let text = preprocess(text);
        let kind = self.kind();

        let mut fields = common_fields(&text, kind);
        fields.set(
            FieldName::VsdNumber,
            Some(codes::format_work_order_vsd(&VsdCodes::from_work_order(&text))),
        );
        fields.set(FieldName::ProductCode, codes::product_code(&text, kind));
        fields.set(FieldName::SizeAgeBreakdown, sizes::wo_size_breakdown(&text));

        debug!(found = fields.found_count(), "extracted WO fields");
        fields
    }
}

/// Field extraction for purchase orders.
///
/// Parsed line items take priority for the product code and size
/// breakdown. When the work order text is supplied, VSD#/VSS# are shown
/// only for the slots the work order carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurchaseOrderExtractor<'a> {
    items: &'a [PoLineItem],
    wo_text: Option<&'a str>,
}

impl<'a> PurchaseOrderExtractor<'a> {
    pub fn new(items: &'a [PoLineItem]) -> Self {
        Self { items, wo_text: None }
    }

    /// Render VSD#/VSS# conditionally on the codes present in this WO.
    pub fn with_work_order(mut self, wo_text: &'a str) -> Self {
        self.wo_text = Some(wo_text);
        self
    }
}

impl FieldSetExtractor for PurchaseOrderExtractor<'_> {
    fn kind(&self) -> DocumentKind {
        DocumentKind::PurchaseOrder
    }

    fn extract(&self, text: &str) -> FieldSet {
        let text = preprocess(text);
        let kind = self.kind();

        let mut fields = common_fields(&text, kind);

        let po_codes = VsdCodes::from_purchase_order(&text);
        let vsd = match self.wo_text {
            Some(wo_text) => {
                let wo_codes = VsdCodes::from_work_order(&preprocess(wo_text));
                codes::format_conditional_vsd(&wo_codes, &po_codes)
            }
            None => codes::format_purchase_order_vsd(&po_codes),
        };
        fields.set(FieldName::VsdNumber, Some(vsd));

        let product_code = self
            .items
            .first()
            .map(|item| item.product_code.clone())
            .filter(|code| !code.is_empty())
            .or_else(|| codes::product_code(&text, kind));
        fields.set(FieldName::ProductCode, product_code);

        let breakdown = sizes::breakdown_from_items(self.items)
            .or_else(|| sizes::po_size_breakdown(&text));
        fields.set(FieldName::SizeAgeBreakdown, breakdown);

        debug!(
            found = fields.found_count(),
            items = self.items.len(),
            "extracted PO fields"
        );
        fields
    }
}

/// Fields whose extraction differs only by document kind.
fn common_fields(text: &str, kind: DocumentKind) -> FieldSet {
    let mut fields = FieldSet::new();
    fields.set(FieldName::Silhouette, descriptive::silhouette(text, kind));
    fields.set(FieldName::FactoryId, codes::factory_id(text));
    fields.set(FieldName::DateOfMfr, codes::date_of_mfr(text));
    fields.set(FieldName::CountryOfOrigin, descriptive::country_of_origin(text, kind));
    fields.set(
        FieldName::AdditionalInstructions,
        descriptive::additional_instructions(text, kind),
    );
    fields.set(
        FieldName::GarmentComponents,
        composition::garment_components(text, kind),
    );
    fields.set(FieldName::CareInstructions, codes::care_code(text));
    fields.set(FieldName::DeliverTo, descriptive::deliver_to(text, kind));
    fields
}

/// Extract fields for `kind` without PO line items.
pub fn extract_fields(text: &str, kind: DocumentKind) -> FieldSet {
    match kind {
        DocumentKind::WorkOrder => WorkOrderExtractor.extract(text),
        DocumentKind::PurchaseOrder => PurchaseOrderExtractor::new(&[]).extract(text),
    }
}
