//! Code-like fields: product code, care code, VSD#/VSS#, factory ID, MFR date.

use super::patterns::*;
use super::first_capture;
use crate::models::DocumentKind;

const CARE_LABEL_MARKER: &str = "LBL.CARE_LB";
const CSD_LABEL: &str = "Colour/Size/Destination:";

/// Lines after the colour/size/destination label searched for the VSD code.
const VSD_SCAN_LINES: usize = 5;

/// Product code (`LB` + digits and optional suffixes).
pub fn product_code(text: &str, kind: DocumentKind) -> Option<String> {
    let specific = match kind {
        DocumentKind::WorkOrder => WO_PRODUCT_CODE
            .captures(text)
            .map(|caps| strip_whitespace(&caps[1]).to_uppercase()),
        DocumentKind::PurchaseOrder => po_product_code(text),
    };

    specific.or_else(|| {
        LB_CODE
            .captures(text)
            .map(|caps| strip_whitespace(&caps[1]).to_uppercase())
    })
}

fn po_product_code(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();

    let from_description = lines.windows(2).find_map(|pair| {
        if !pair[0].contains(CARE_LABEL_MARKER) {
            return None;
        }
        PO_DESCRIPTION_CODE
            .captures(pair[1])
            .map(|caps| caps[1].trim().to_string())
            .filter(|code| code.chars().count() >= 4)
            .map(|code| code.to_uppercase())
    });

    from_description.or_else(|| {
        PO_CARE_LABEL_CODE
            .captures(text)
            .map(|caps| format!("LB{}", &caps[1]))
    })
}

/// Care code (`MWW` + digits), uppercased.
pub fn care_code(text: &str) -> Option<String> {
    first_capture(&CARE_CODE, text).map(|code| code.to_uppercase())
}

/// VSD#/VSS# codes found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VsdCodes {
    pub vsd: Option<String>,
    pub vss: Option<String>,
}

impl VsdCodes {
    /// Codes labelled `VSD#:` / `VSS#:` in a work order.
    pub fn from_work_order(text: &str) -> Self {
        Self {
            vsd: WO_VSD.captures(text).map(|caps| caps[1].to_string()),
            vss: WO_VSS.captures(text).map(|caps| caps[1].to_string()),
        }
    }

    /// Codes derived from PO structure.
    ///
    /// VSD is a six-digit number and a three-character code following the
    /// colour/size/destination label (on the same line or shortly after).
    /// VSS is the digit run after the last hyphen of the care-label line.
    pub fn from_purchase_order(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let mut codes = Self::default();

        for (idx, line) in lines.iter().enumerate() {
            if codes.vsd.is_none() {
                if let Some((_, after)) = line.split_once(CSD_LABEL) {
                    let window = std::iter::once(after)
                        .chain(lines.iter().skip(idx + 1).take(VSD_SCAN_LINES).copied());
                    codes.vsd = window.into_iter().find_map(|candidate| {
                        PO_VSD_CODE
                            .captures(candidate)
                            .map(|caps| format!("{} {}", &caps[1], &caps[2]))
                    });
                }
            }

            if codes.vss.is_none() && line.contains(CARE_LABEL_MARKER) {
                codes.vss = PO_VSS_ON_CARE_LINE
                    .captures(line)
                    .or_else(|| TRAILING_HYPHEN_DIGITS.captures(line))
                    .map(|caps| caps[1].to_string());
            }
        }

        codes
    }

    pub fn is_empty(&self) -> bool {
        self.vsd.is_none() && self.vss.is_none()
    }
}

/// `VSD# <v> | VSS# <v>` with `Not found` for missing slots.
pub fn format_work_order_vsd(codes: &VsdCodes) -> String {
    format!(
        "VSD# {} | VSS# {}",
        codes.vsd.as_deref().unwrap_or("Not found"),
        codes.vss.as_deref().unwrap_or("Not found")
    )
}

/// PO codes on their own; absent slots are omitted.
pub fn format_purchase_order_vsd(codes: &VsdCodes) -> String {
    let mut parts = Vec::new();
    if let Some(vsd) = &codes.vsd {
        parts.push(format!("VSD# {}(PO)", vsd));
    }
    if let Some(vss) = &codes.vss {
        parts.push(format!("VSS# {}(PO)", vss));
    }

    if parts.is_empty() {
        "VSD/VSS not found in PO".to_string()
    } else {
        parts.join(" || ")
    }
}

/// PO codes shown only for the slots the WO carries.
///
/// A slot missing from the WO is left out entirely, even when the PO has it.
pub fn format_conditional_vsd(wo: &VsdCodes, po: &VsdCodes) -> String {
    let mut parts = Vec::new();

    if let Some(wo_vsd) = &wo.vsd {
        parts.push(format!(
            "VSD# {}(WO) | VSD# {}(PO)",
            wo_vsd,
            po.vsd.as_deref().unwrap_or("Not in PO")
        ));
    }
    if let Some(wo_vss) = &wo.vss {
        parts.push(format!(
            "VSS# {}(WO) | VSS# {}(PO)",
            wo_vss,
            po.vss.as_deref().unwrap_or("Not in PO")
        ));
    }

    if parts.is_empty() {
        "No codes found in WO".to_string()
    } else {
        parts.join(" || ")
    }
}

/// Eight-digit factory identifier.
pub fn factory_id(text: &str) -> Option<String> {
    first_capture(&FACTORY_ID, text)
}

/// Manufacturing date as `MM/YY`.
pub fn date_of_mfr(text: &str) -> Option<String> {
    if let Some(raw) = first_capture(&MFR_DATE, text) {
        let digits = strip_whitespace(&raw);
        if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
            return Some(format!("{}/{}", &digits[..2], &digits[2..]));
        }
        return Some(raw);
    }

    MONTH_YEAR.iter().find_map(|re| {
        re.captures_iter(text).find_map(|caps| {
            let month: u32 = caps[1].parse().ok()?;
            (1..=12)
                .contains(&month)
                .then(|| format!("{:02}/{}", month, &caps[2]))
        })
    })
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
