//! Garment components and fibre contents.

use super::patterns::*;
use crate::models::DocumentKind;

/// At most this many fibre entries are reported.
const MAX_COMPONENTS: usize = 10;

/// Fibre composition as `"<fibre> - <pct>%"` entries, in document order.
///
/// Localized fibre names are mapped to one canonical English name and
/// duplicates are dropped. When the labelled composition section yields
/// nothing, the whole document is scanned instead.
pub fn garment_components(text: &str, kind: DocumentKind) -> Option<String> {
    let mut components = match kind {
        DocumentKind::WorkOrder => WO_COMPOSITION_SECTION
            .captures(text)
            .map(|caps| scan_fibres(&caps[1]))
            .unwrap_or_default(),
        DocumentKind::PurchaseOrder => PO_COMPOSITION_SECTION
            .captures(text)
            .map(|caps| scan_component_segments(&caps[1]))
            .unwrap_or_default(),
    };

    if components.is_empty() {
        components = scan_fibres(text);
    }

    let mut unique: Vec<String> = Vec::new();
    for component in components {
        if !unique.contains(&component) {
            unique.push(component);
        }
    }
    unique.truncate(MAX_COMPONENTS);

    (!unique.is_empty()).then(|| unique.join(", "))
}

/// Scan each `Body:` / `Lace:` / `Gusset:` segment of a PO care section.
///
/// A segment ends at the next component label or at any other
/// capitalized `Label:`.
fn scan_component_segments(section: &str) -> Vec<String> {
    let mut found = Vec::new();

    for label in COMPONENT_LABEL.find_iter(section) {
        let rest = &section[label.end()..];
        let next_component = COMPONENT_LABEL.find(rest).map(|m| m.start());
        let next_label = ANY_LABEL.find(rest).map(|m| m.start());
        let end = match (next_component, next_label) {
            (Some(a), Some(b)) => a.min(b),
            (a, b) => a.or(b).unwrap_or(rest.len()),
        };
        found.extend(scan_fibres(&rest[..end]));
    }

    found
}

fn scan_fibres(text: &str) -> Vec<String> {
    FIBRE
        .captures_iter(text)
        .map(|caps| format!("{} - {}%", canonical_fibre(&caps[2]), &caps[1]))
        .collect()
}

/// Map a localized fibre name to its canonical English name.
fn canonical_fibre(name: &str) -> &'static str {
    let name = name.to_lowercase();

    if name.contains("recycl") || name.contains("reciclada") || name.contains("riciclata") {
        "recycled polyamide"
    } else if name.starts_with("cot") || name.starts_with("algod") || name == "棉" {
        "cotton"
    } else if name == "modal" || name == "莫代尔" {
        "modal"
    } else if name.contains("lasta") || name.contains("lasth") || name == "氨纶" {
        "elastane"
    } else if name.starts_with("poliam") || name.starts_with("polyam") || name == "锦纶" {
        "polyamide"
    } else {
        "polyester"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wo_section_with_translations() {
        let text = "Garment Components & Fibre Contents:\n\
                    Body: 95% cotton / 95% coton / 95% algodón\n\
                    5% elastane / 5% élasthanne\n\
                    Care Instructions: MWW1234";
        assert_eq!(
            garment_components(text, DocumentKind::WorkOrder).as_deref(),
            Some("cotton - 95%, elastane - 5%")
        );
    }

    #[test]
    fn test_wo_falls_back_to_whole_document() {
        let text = "Body 88% polyamide 12% elastane";
        assert_eq!(
            garment_components(text, DocumentKind::WorkOrder).as_deref(),
            Some("polyamide - 88%, elastane - 12%")
        );
    }

    #[test]
    fn test_po_component_segments() {
        let text = "Care Composition in CC\n\
                    Body: 90% Recycled Polyamide 10% Elastane\n\
                    Lace: 100% Polyester\n\
                    Gusset: 100% Cotton\n\
                    Item number: 1";
        assert_eq!(
            garment_components(text, DocumentKind::PurchaseOrder).as_deref(),
            Some("recycled polyamide - 90%, elastane - 10%, polyester - 100%, cotton - 100%")
        );
    }

    #[test]
    fn test_cot_abbreviation_and_missing() {
        assert_eq!(
            garment_components("Gusset 100% cot", DocumentKind::PurchaseOrder).as_deref(),
            Some("cotton - 100%")
        );
        assert_eq!(garment_components("no fibres", DocumentKind::WorkOrder), None);
    }
}
