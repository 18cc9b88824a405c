//! Regex patterns for WO/PO field extraction.
//!
//! Patterns within a group are tried in declaration order; the order encodes
//! which label wins when a document carries several.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Product code
    pub static ref WO_PRODUCT_CODE: Regex = Regex::new(
        r"(?i)Product\s+Code\s*:\s*(LB[ \t]*\d{4,}(?:[ \t]*/?\w+)?(?:[ \t]*/?\w+)?)"
    ).unwrap();

    pub static ref PO_DESCRIPTION_CODE: Regex = Regex::new(r"_([^_\-]+)-").unwrap();

    pub static ref PO_CARE_LABEL_CODE: Regex = Regex::new(r"LBL\.CARE_LB\s*(\d+)").unwrap();

    pub static ref LB_CODE: Regex = Regex::new(r"(?i)\b(LB\s*\d{4,})\b").unwrap();

    // Care code
    pub static ref CARE_CODE: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(MWW\d+)\b").unwrap(),
        Regex::new(r"(?i)Care\s+(?:Code|Instructions?)\s*:?\s*(MWW\d+)").unwrap(),
        Regex::new(r"(?i)Care\s*:?\s*(MWW\d+)").unwrap(),
    ];

    // Silhouette
    pub static ref WO_SILHOUETTE: Regex = Regex::new(
        r"(?i)Silhouette[ \t]*:[ \t]*[_\- \t]*([A-Za-z0-9 \t/&]+)"
    ).unwrap();

    pub static ref PO_SILHOUETTE: Vec<Regex> = GARMENT_TYPES
        .iter()
        .map(|kw| Regex::new(&format!(r"([A-Z ]*{}[A-Z ]*)", kw)).unwrap())
        .collect();

    // VSD# / VSS#
    pub static ref WO_VSD: Regex = Regex::new(r"(?i)VSD#[ \t]*:?[ \t]*([A-Za-z0-9\-]+)").unwrap();
    pub static ref WO_VSS: Regex = Regex::new(r"(?i)VSS#[ \t]*:?[ \t]*([A-Za-z0-9\-]+)").unwrap();

    pub static ref PO_VSD_CODE: Regex = Regex::new(r"\b(\d{6})\s+([A-Z][A-Z0-9]{2})\b").unwrap();
    pub static ref PO_VSS_ON_CARE_LINE: Regex = Regex::new(r"LBL\.CARE_LB\s+.*?-(\d+)\s*$").unwrap();
    pub static ref TRAILING_HYPHEN_DIGITS: Regex = Regex::new(r"-(\d+)\s*$").unwrap();

    // Factory ID
    pub static ref FACTORY_ID: Vec<Regex> = vec![
        Regex::new(r"(?i)Factory\s*ID\s*:\s*(\d{8})").unwrap(),
        Regex::new(r"(?i)FactoryID\s*:\s*(\d{8})").unwrap(),
        Regex::new(r"(?i)Factory\s+Code\s*:\s*(\d{8})").unwrap(),
    ];

    // Date of manufacture
    pub static ref MFR_DATE: Vec<Regex> = vec![
        Regex::new(r"(?i)Date\s+of\s+MFR#\s*:\s*(\d{2}[ \t]*\d{2})").unwrap(),
        Regex::new(r"(?i)DateofMFR#\s*:\s*(\d{4})").unwrap(),
        Regex::new(r"(?i)MFR#\s*:\s*(\d{2}[ \t]*\d{2})").unwrap(),
        Regex::new(r"(?i)Date.*MFR.*:\s*(\d{2}[ \t]*\d{2})").unwrap(),
    ];

    pub static ref MONTH_YEAR: Vec<Regex> = vec![
        Regex::new(r"\b(\d{1,2})[ \t]+(\d{2})\b").unwrap(),
        Regex::new(r"\b(\d{1,2})/(\d{2})\b").unwrap(),
    ];

    // Country of origin (matched against lowercased text)
    pub static ref WO_ORIGIN: Vec<Regex> = vec![
        Regex::new(r"made\s+in\s+([a-z ]+)").unwrap(),
        Regex::new(r"fabriqu[eé]\s+(?:au|en)\s+([a-z ]+)").unwrap(),
        Regex::new(r"hecho\s+en\s+([a-z ]+)").unwrap(),
        Regex::new(r"country\s+of\s+origin\s*[:\-]?\s*([a-z ]+)").unwrap(),
        Regex::new(r"countryoforigin\s*[:\-]?\s*([a-z ]+)").unwrap(),
    ];

    pub static ref PO_COO: Regex = Regex::new(r"(?i)\bCOO\b\s*[:\-]?\s*([^\n\r]+)").unwrap();

    pub static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();

    // Additional instructions
    pub static ref WO_INSTRUCTIONS: Vec<Regex> = vec![
        Regex::new(r"(?i)Additional\s+Instructions\s*:?\s*([^\n]{10,100})").unwrap(),
        Regex::new(r"(?i)instructions\s*:?\s*([^\n]{10,100})").unwrap(),
        Regex::new(r"(?i)special\s+(?:requirements|instructions)\s*:?\s*([^\n]{10,100})").unwrap(),
    ];

    pub static ref PO_INSTRUCTIONS: Vec<Regex> = vec![
        Regex::new(r"(?i)Additional\s+Instructions[: \t]*([^\n]+)").unwrap(),
        Regex::new(r"(?i)Instructions[: \t]*([^\n]+)").unwrap(),
    ];

    // Garment components
    pub static ref WO_COMPOSITION_SECTION: Regex = Regex::new(
        r"(?is)Garment Components\s*&\s*Fibre Contents\s*:(.*?)(?:Care Instructions|Technical Specifications|End of Works Order|\z)"
    ).unwrap();

    pub static ref PO_COMPOSITION_SECTION: Regex = Regex::new(
        r"(?is)Care Composition in CC\s+(.*?)(?:\n\s*(?:Brandix|Table|Item number|Page:|PO Number:)|\z)"
    ).unwrap();

    pub static ref COMPONENT_LABEL: Regex = Regex::new(r"(?i)\b(Body|Lace|Gusset)\s*:").unwrap();
    pub static ref ANY_LABEL: Regex = Regex::new(r"\b[A-Z][a-z]+\s*:").unwrap();

    pub static ref FIBRE: Regex = Regex::new(
        r"(?i)(\d+)\s*%\s*(recycled\s+polyamide|polyamide\s+recycl[eé]|poliamida\s+reciclada|poliammide\s*riciclata|cotton|coton|algod[oó]n|cotone|棉|modal|莫代尔|elastane|[eé]lasthanne|elastano|elastan|氨纶|polyamide|poliamida|poliammide|锦纶|polyester|poli[eé]ster|poliestere|聚酯纤维|cot\b)"
    ).unwrap();

    // Size breakdown
    pub static ref WO_SIZE_ROW: Regex = Regex::new(
        r"^([A-Z]{1,3})(?:/[^/\s]+)*\s+(\d{1,6}(?:,\d{3})*)$"
    ).unwrap();

    pub static ref SLASHED_SIZE: Regex = Regex::new(r"/\s*([A-Z]{1,3})\s*/").unwrap();

    pub static ref QUANTITY_LINE: Vec<Regex> = vec![
        Regex::new(r"^\d+\.\d{2}$").unwrap(),
        Regex::new(r"^\d{1,6}(?:,\d{3})*$").unwrap(),
    ];

    pub static ref LOOSE_SIZE_QTY: Vec<Regex> = vec![
        Regex::new(r"([A-Z]{1,3})(?:/[^/\s]+)*\s+(\d{1,6}(?:,\d{3})*)").unwrap(),
        Regex::new(r"([A-Z]{1,3})\s*[:\-]\s*(\d{1,6}(?:,\d{3})*)").unwrap(),
    ];

    pub static ref PO_ITEM_QUANTITY: Regex = Regex::new(
        r"^\d+\s+[A-Z0-9]+\s+(\d+(?:\.\d{2})?)\s+PCS"
    ).unwrap();

    pub static ref PCS_QUANTITY: Regex = Regex::new(r"(\d+(?:\.\d{2})?)\s+PCS").unwrap();

    // Deliver to
    pub static ref CUSTOMER_DELIVERY_NAME: Regex = Regex::new(
        r"(?i)Customer\s+Delivery\s+Name\s*:\s*([^\n]+)"
    ).unwrap();

    pub static ref DELIVER_TO: Regex = Regex::new(r"(?i)Deliver\s+To\s*:\s*([^\n]+)").unwrap();

    pub static ref DELIVERY_LOCATION: Regex = Regex::new(
        r"(?i)Delivery\s+Location\s*:\s*([^\n]+)"
    ).unwrap();
}

/// Multilingual spellings of the decoration-exclusion phrase (lowercase).
pub const DECORATION_EXCLUSION: [&str; 5] = [
    "exclusive of decoration",
    "sauf décoration",
    "no incluye la decoración",
    "esclusa la decorazione",
    "装饰除外",
];

/// Canonical English decoration-exclusion value.
pub const DECORATION_EXCLUSION_CANONICAL: &str = "exclusive of decoration";

/// Garment keywords searched for on POs, in priority order.
pub const GARMENT_TYPES: [&str; 7] = ["THONG", "BRIEF", "BIKINI", "BOYSHORT", "HIPSTER", "PANTY", "PANTIE"];
