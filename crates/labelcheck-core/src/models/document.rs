//! Document, field, and line-item data models.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Rendered value of a field that could not be extracted.
pub const NOT_FOUND: &str = "Not found";

/// Which kind of document a text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Internal production work order.
    WorkOrder,
    /// Buyer-issued purchase order.
    PurchaseOrder,
}

impl DocumentKind {
    /// Short label used in reports ("WO" / "PO").
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::WorkOrder => "WO",
            DocumentKind::PurchaseOrder => "PO",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The fixed set of compared fields, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldName {
    ProductCode,
    Silhouette,
    VsdNumber,
    SizeAgeBreakdown,
    FactoryId,
    DateOfMfr,
    CountryOfOrigin,
    AdditionalInstructions,
    GarmentComponents,
    CareInstructions,
    DeliverTo,
}

impl FieldName {
    /// All fields in report order.
    pub const ALL: [FieldName; 11] = [
        FieldName::ProductCode,
        FieldName::Silhouette,
        FieldName::VsdNumber,
        FieldName::SizeAgeBreakdown,
        FieldName::FactoryId,
        FieldName::DateOfMfr,
        FieldName::CountryOfOrigin,
        FieldName::AdditionalInstructions,
        FieldName::GarmentComponents,
        FieldName::CareInstructions,
        FieldName::DeliverTo,
    ];

    /// Display label, as printed in report headers.
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::ProductCode => "Product Code",
            FieldName::Silhouette => "Silhouette",
            FieldName::VsdNumber => "VSD#",
            FieldName::SizeAgeBreakdown => "Size/Age Breakdown",
            FieldName::FactoryId => "Factory ID",
            FieldName::DateOfMfr => "Date of MFR#",
            FieldName::CountryOfOrigin => "Country of Origin",
            FieldName::AdditionalInstructions => "Additional Instructions",
            FieldName::GarmentComponents => "Garment Components & Fibre Contents",
            FieldName::CareInstructions => "Care Instructions",
            FieldName::DeliverTo => "Deliver To",
        }
    }

    /// Look a field up by its display label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extracted values for every field of one document.
///
/// Every field is always present; `None` means the extractor found nothing
/// and is rendered as [`NOT_FOUND`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    values: [Option<String>; 11],
}

impl FieldSet {
    /// Create a field set with every field missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Blank strings are stored as missing.
    pub fn set(&mut self, field: FieldName, value: Option<String>) {
        let value = value.filter(|v| !v.trim().is_empty());
        self.values[Self::index(field)] = value;
    }

    /// Builder form of [`FieldSet::set`].
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Raw value, `None` when not extracted.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values[Self::index(field)].as_deref()
    }

    /// Value as displayed: the extracted string or `"Not found"`.
    pub fn display_value(&self, field: FieldName) -> &str {
        self.get(field).unwrap_or(NOT_FOUND)
    }

    /// Iterate fields in report order with their raw values.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, Option<&str>)> + '_ {
        FieldName::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Number of fields that were extracted.
    pub fn found_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    fn index(field: FieldName) -> usize {
        field as usize
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FieldName::ALL.len()))?;
        for field in FieldName::ALL {
            map.serialize_entry(field.label(), self.display_value(field))?;
        }
        map.end()
    }
}

/// One aggregated PO line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoLineItem {
    /// Item number from the first line seen for this key.
    pub item_number: String,
    /// Item code (e.g. `TAG_BIKINI`).
    pub item_code: String,
    /// Summed quantity across all lines sharing the key.
    pub quantity: f64,
    /// Colour code, uppercased; may be empty.
    pub colour_code: String,
    /// Size token; may be empty.
    pub size: String,
    /// Document-level style number.
    pub style: String,
    /// Product code derived from the item description.
    pub product_code: String,
}

impl PoLineItem {
    /// Aggregation key: (size, colour, style).
    pub fn key(&self) -> (String, String, String) {
        (self.size.clone(), self.colour_code.clone(), self.style.clone())
    }
}

/// Which backend produced the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Structure-aware extraction with tables.
    Structured,
    /// Layout-preserving extraction (plain + block pass).
    Layout,
    /// Minimal page-by-page extraction.
    Basic,
    /// Every backend declined.
    Failed,
}

impl ExtractionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionMethod::Structured => "structured (high quality route)",
            ExtractionMethod::Layout => "layout analysis",
            ExtractionMethod::Basic => "basic",
            ExtractionMethod::Failed => "failed",
        }
    }
}

/// Coarse quality grade of the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionQuality {
    High,
    Medium,
    Low,
    Failed,
}

impl fmt::Display for ExtractionQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExtractionQuality::High => "high",
            ExtractionQuality::Medium => "medium",
            ExtractionQuality::Low => "low",
            ExtractionQuality::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Metadata describing how a document's text was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionInfo {
    pub method: ExtractionMethod,
    pub page_count: usize,
    pub tables_found: usize,
    pub quality: ExtractionQuality,
}

impl Default for ExtractionInfo {
    fn default() -> Self {
        Self {
            method: ExtractionMethod::Failed,
            page_count: 0,
            tables_found: 0,
            quality: ExtractionQuality::Failed,
        }
    }
}

/// Text plus metadata for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub raw_text: String,
    pub info: ExtractionInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fieldset_renders_missing_as_not_found() {
        let fields = FieldSet::new().with(FieldName::FactoryId, "36013779");
        assert_eq!(fields.display_value(FieldName::FactoryId), "36013779");
        assert_eq!(fields.display_value(FieldName::Silhouette), NOT_FOUND);
        assert_eq!(fields.found_count(), 1);
    }

    #[test]
    fn test_fieldset_blank_is_missing() {
        let mut fields = FieldSet::new();
        fields.set(FieldName::DeliverTo, Some("   ".to_string()));
        assert_eq!(fields.get(FieldName::DeliverTo), None);
    }

    #[test]
    fn test_fieldset_serializes_every_field_in_order() {
        let json = serde_json::to_string(&FieldSet::new()).unwrap();
        assert!(json.starts_with(r#"{"Product Code":"Not found","Silhouette""#));
        assert!(json.ends_with(r#""Deliver To":"Not found"}"#));
        assert_eq!(json.matches(NOT_FOUND).count(), 11);
    }

    #[test]
    fn test_field_name_from_label() {
        assert_eq!(FieldName::from_label("vsd#"), Some(FieldName::VsdNumber));
        assert_eq!(FieldName::from_label("Unknown"), None);
    }
}
