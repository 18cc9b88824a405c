//! Free-text fields: country of origin, silhouette, additional instructions, deliver-to.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::*;
use super::{collapse_whitespace, title_case};
use crate::models::DocumentKind;

lazy_static! {
    static ref FACTORY_CODE_LABEL: Regex = Regex::new(r"(?i)factory code").unwrap();
}

/// Country of origin.
///
/// Work orders carry a multilingual "made in" statement. Purchase orders
/// carry a `COO` label that appears ahead of the factory code; anything
/// after the factory code label is ignored.
pub fn country_of_origin(text: &str, kind: DocumentKind) -> Option<String> {
    match kind {
        DocumentKind::WorkOrder => wo_country_of_origin(text),
        DocumentKind::PurchaseOrder => {
            let end = FACTORY_CODE_LABEL.find(text)?.start();
            let caps = PO_COO.captures(&text[..end])?;
            canonical_country(&caps[1])
        }
    }
}

fn wo_country_of_origin(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();

    WO_ORIGIN
        .iter()
        .find_map(|re| canonical_country(&re.captures(&lowered)?[1]))
}

/// Title-cased country name with punctuation removed.
fn canonical_country(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let country = NON_WORD.replace_all(&lowered, "");
    let country = collapse_whitespace(&country);

    if country.contains("sri") && country.contains("lanka") {
        Some("Sri Lanka".to_string())
    } else if !country.is_empty() && country.chars().count() < 30 {
        Some(title_case(&country))
    } else {
        None
    }
}

/// Garment silhouette, title-cased.
pub fn silhouette(text: &str, kind: DocumentKind) -> Option<String> {
    match kind {
        DocumentKind::WorkOrder => WO_SILHOUETTE.captures(text).and_then(|caps| {
            let value = collapse_whitespace(&caps[1]);
            let len = value.chars().count();
            (1..=50).contains(&len).then(|| title_case(&value))
        }),
        DocumentKind::PurchaseOrder => {
            let upper = text.to_uppercase();
            GARMENT_TYPES
                .iter()
                .zip(PO_SILHOUETTE.iter())
                .filter(|(keyword, _)| upper.contains(**keyword))
                .find_map(|(_, re)| {
                    re.find_iter(&upper).find_map(|m| {
                        let value = collapse_whitespace(m.as_str());
                        let len = value.chars().count();
                        (3..=30).contains(&len).then(|| title_case(&value))
                    })
                })
        }
    }
}

/// Additional instructions, canonicalized to the English
/// decoration-exclusion phrase when any translation of it appears.
pub fn additional_instructions(text: &str, kind: DocumentKind) -> Option<String> {
    let lowered = text.to_lowercase();
    if DECORATION_EXCLUSION.iter().any(|phrase| lowered.contains(phrase)) {
        return Some(DECORATION_EXCLUSION_CANONICAL.to_string());
    }

    let (patterns, min_len): (&[Regex], usize) = match kind {
        DocumentKind::WorkOrder => (WO_INSTRUCTIONS.as_slice(), 10),
        DocumentKind::PurchaseOrder => (PO_INSTRUCTIONS.as_slice(), 5),
    };

    patterns.iter().find_map(|re| {
        re.captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|v| v.chars().count() >= min_len)
    })
}

/// Delivery destination.
pub fn deliver_to(text: &str, kind: DocumentKind) -> Option<String> {
    match kind {
        DocumentKind::WorkOrder => {
            match (labelled(&CUSTOMER_DELIVERY_NAME, text), labelled(&DELIVER_TO, text)) {
                (Some(name), Some(address)) => Some(format!("{} + {}", name, address)),
                (name, address) => name.or(address),
            }
        }
        DocumentKind::PurchaseOrder => labelled(&DELIVERY_LOCATION, text),
    }
}

fn labelled(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wo_origin_normalizes_sri_lanka() {
        let text = "Care Instructions\nMADE IN SRI LANKA / FABRIQUÉ AU SRI LANKA";
        assert_eq!(
            country_of_origin(text, DocumentKind::WorkOrder).as_deref(),
            Some("Sri Lanka")
        );
        assert_eq!(
            country_of_origin("Country of Origin: viet nam", DocumentKind::WorkOrder).as_deref(),
            Some("Viet Nam")
        );
        assert_eq!(country_of_origin("no origin here", DocumentKind::WorkOrder), None);
    }

    #[test]
    fn test_po_origin_requires_factory_code_label() {
        let text = "Buyer: VS\nCOO: SRI LANKA\nFactory Code: 36013779";
        assert_eq!(
            country_of_origin(text, DocumentKind::PurchaseOrder).as_deref(),
            Some("Sri Lanka")
        );
        assert_eq!(
            country_of_origin("COO: SRI LANKA", DocumentKind::PurchaseOrder),
            None
        );
        assert_eq!(
            country_of_origin("Factory Code: 1\nCOO: CHINA", DocumentKind::PurchaseOrder),
            None
        );
    }

    #[test]
    fn test_po_origin_matches_wo_form() {
        let po = "COO: SRI-LANKA.\nFactory Code: 36013779";
        assert_eq!(
            country_of_origin(po, DocumentKind::PurchaseOrder).as_deref(),
            Some("Sri Lanka")
        );
        assert_eq!(
            country_of_origin("COO - VIET NAM;\nFactory Code: 1", DocumentKind::PurchaseOrder).as_deref(),
            Some("Viet Nam")
        );
    }

    #[test]
    fn test_po_origin_ignores_words_containing_coo() {
        let text = "Coordinator: J. Perera\nFactory Code: 36013779";
        assert_eq!(country_of_origin(text, DocumentKind::PurchaseOrder), None);

        let text = "Coordinator: J. Perera\nCOO: CHINA\nFactory Code: 36013779";
        assert_eq!(
            country_of_origin(text, DocumentKind::PurchaseOrder).as_deref(),
            Some("China")
        );
    }

    #[test]
    fn test_silhouette() {
        assert_eq!(
            silhouette("Silhouette: ___ CHEEKY PANTY\nNext: x", DocumentKind::WorkOrder).as_deref(),
            Some("Cheeky Panty")
        );
        assert_eq!(
            silhouette("Item\nLACE BIKINI PANTY\nTotal", DocumentKind::PurchaseOrder).as_deref(),
            Some("Lace Bikini Panty")
        );
        assert_eq!(silhouette("BRA 34B", DocumentKind::PurchaseOrder), None);
    }

    #[test]
    fn test_additional_instructions() {
        assert_eq!(
            additional_instructions("SAUF DÉCORATION", DocumentKind::WorkOrder).as_deref(),
            Some("exclusive of decoration")
        );
        assert_eq!(
            additional_instructions("Additional Instructions: wash before wear", DocumentKind::WorkOrder)
                .as_deref(),
            Some("wash before wear")
        );
        assert_eq!(
            additional_instructions("Instructions: short", DocumentKind::WorkOrder),
            None
        );
        assert_eq!(
            additional_instructions("Instructions: short", DocumentKind::PurchaseOrder).as_deref(),
            Some("short")
        );
    }

    #[test]
    fn test_deliver_to() {
        let wo = "Customer Delivery Name: VS Logistics\nDeliver To: Columbus OH";
        assert_eq!(
            deliver_to(wo, DocumentKind::WorkOrder).as_deref(),
            Some("VS Logistics + Columbus OH")
        );
        assert_eq!(
            deliver_to("Deliver To: Columbus OH", DocumentKind::WorkOrder).as_deref(),
            Some("Columbus OH")
        );
        assert_eq!(
            deliver_to("Delivery Location: DC 12", DocumentKind::PurchaseOrder).as_deref(),
            Some("DC 12")
        );
        assert_eq!(deliver_to("nothing", DocumentKind::PurchaseOrder), None);
    }
}
