//! Size/age breakdown for work orders and purchase orders.

use std::collections::BTreeMap;

use super::patterns::*;
use crate::models::PoLineItem;
use crate::pdf::primary_text;

/// Sizes recognised in breakdowns, in report order.
pub const SIZE_ORDER: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];

/// Lines after the breakdown header inspected for size rows.
const HEADER_WINDOW: usize = 10;

fn size_rank(size: &str) -> Option<usize> {
    SIZE_ORDER.iter().position(|s| *s == size)
}

/// WO size breakdown as `"SIZE-QTY"` pairs joined by `", "`.
///
/// Rows following the breakdown header are read first; a size seen twice
/// keeps its last quantity. Without a header, slash-delimited size tokens
/// are paired with a nearby quantity-only line, then loose `SIZE QTY`
/// pairs fill in sizes still missing.
pub fn wo_size_breakdown(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut sizes: BTreeMap<usize, String> = BTreeMap::new();

    let header = lines.iter().position(|line| {
        line.contains("Size/Age Breakdown")
            || (line.contains("Panties/Swim Bottoms") && line.contains("Order Quantity"))
    });

    if let Some(start) = header {
        let end = (start + 1 + HEADER_WINDOW).min(lines.len());
        for line in &lines[start + 1..end] {
            if let Some(caps) = WO_SIZE_ROW.captures(line) {
                if let Some(rank) = size_rank(&caps[1]) {
                    sizes.insert(rank, caps[2].replace(',', ""));
                }
            }
        }
    }

    if sizes.is_empty() {
        collect_slashed_sizes(&lines, &mut sizes);
        collect_loose_sizes(&lines, &mut sizes);
    }

    if sizes.is_empty() {
        return None;
    }

    Some(
        sizes
            .iter()
            .map(|(rank, qty)| format!("{}-{}", SIZE_ORDER[*rank], qty))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn collect_slashed_sizes(lines: &[&str], sizes: &mut BTreeMap<usize, String>) {
    for (idx, line) in lines.iter().enumerate() {
        for caps in SLASHED_SIZE.captures_iter(line) {
            let Some(rank) = size_rank(&caps[1].to_uppercase()) else {
                continue;
            };
            if sizes.contains_key(&rank) {
                continue;
            }

            let from = idx.saturating_sub(5);
            let to = (idx + 15).min(lines.len());
            let quantity = lines[from..to]
                .iter()
                .find(|candidate| QUANTITY_LINE.iter().any(|re| re.is_match(candidate)));

            if let Some(qty) = quantity {
                sizes.insert(rank, qty.replace(',', ""));
            }
        }
    }
}

/// `SIZE QTY` pairs; a size and its quantity must share a line.
fn collect_loose_sizes(lines: &[&str], sizes: &mut BTreeMap<usize, String>) {
    for re in LOOSE_SIZE_QTY.iter() {
        for line in lines {
            for caps in re.captures_iter(line) {
                if let Some(rank) = size_rank(&caps[1].to_uppercase()) {
                    sizes.entry(rank).or_insert_with(|| caps[2].replace(',', ""));
                }
            }
        }
    }
}

/// PO quantities, in document order, as `"N.NN"` strings joined by `", "`.
///
/// Item rows contribute every quantity; standalone `N PCS` mentions are
/// added only when the same value is not already listed. Table appendices
/// and second renditions of a page are not counted.
pub fn po_size_breakdown(text: &str) -> Option<String> {
    let text = primary_text(text);
    let mut quantities: Vec<String> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = PO_ITEM_QUANTITY.captures(line) {
            quantities.push(with_cents(&caps[1]));
            continue;
        }

        for caps in PCS_QUANTITY.captures_iter(line) {
            let qty = with_cents(&caps[1]);
            if !quantities.contains(&qty) {
                quantities.push(qty);
            }
        }
    }

    (!quantities.is_empty()).then(|| quantities.join(", "))
}

fn with_cents(qty: &str) -> String {
    if qty.contains('.') {
        qty.to_string()
    } else {
        format!("{}.00", qty)
    }
}

/// Per-size totals from parsed PO line items.
///
/// Items with no size or a zero quantity are skipped. Known sizes come
/// first in report order; any other size follows in first-seen order.
pub fn breakdown_from_items(items: &[PoLineItem]) -> Option<String> {
    let mut totals: Vec<(String, f64)> = Vec::new();

    for item in items {
        if item.size.is_empty() || item.quantity == 0.0 {
            continue;
        }
        match totals.iter_mut().find(|(size, _)| *size == item.size) {
            Some((_, total)) => *total += item.quantity,
            None => totals.push((item.size.clone(), item.quantity)),
        }
    }

    if totals.is_empty() {
        return None;
    }

    totals.sort_by_key(|(size, _)| size_rank(size).unwrap_or(SIZE_ORDER.len()));

    Some(
        totals
            .iter()
            .map(|(size, qty)| format!("{}-{}", size, format_quantity(*qty)))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Render a quantity without a trailing `.0` for whole numbers.
pub fn format_quantity(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{}", qty as i64)
    } else {
        let s = format!("{:.4}", qty);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(size: &str, quantity: f64) -> PoLineItem {
        PoLineItem {
            item_number: "1".to_string(),
            item_code: "LB5735".to_string(),
            quantity,
            colour_code: String::new(),
            size: size.to_string(),
            style: String::new(),
            product_code: String::new(),
        }
    }

    #[test]
    fn test_wo_header_rows() {
        let text = "Size/Age Breakdown\nL 300\nXS/TP 1,200\nM 450\nM 500\nTotal 2450";
        assert_eq!(
            wo_size_breakdown(text).as_deref(),
            Some("XS-1200, M-500, L-300")
        );
    }

    #[test]
    fn test_wo_slashed_fallback() {
        let text = "Colour / S / Black\nOrder\n240\nnotes";
        assert_eq!(wo_size_breakdown(text).as_deref(), Some("S-240"));
    }

    #[test]
    fn test_wo_loose_pairs_stay_on_one_line() {
        assert_eq!(wo_size_breakdown("Colour Black M\n240 units"), None);
        assert_eq!(wo_size_breakdown("Colour Black\nM 240").as_deref(), Some("M-240"));
    }

    #[test]
    fn test_wo_without_sizes() {
        assert_eq!(wo_size_breakdown("nothing to see"), None);
    }

    #[test]
    fn test_po_quantities() {
        let text = "10 LB5735 500 PCS\n10 LB5736 500 PCS\nTotal 1000.00 PCS\n12.50 PCS";
        assert_eq!(
            po_size_breakdown(text).as_deref(),
            Some("500.00, 500.00, 1000.00, 12.50")
        );
        assert_eq!(po_size_breakdown("no quantities"), None);
    }

    #[test]
    fn test_po_quantities_ignore_table_appendix() {
        let text = "--- Page 1 ---
10 LB5735 500 PCS   EUR 1.00
20 LB5736 700 PCS   EUR 1.00

--- Table 1 on Page 1 ---
10 LB5735 500 PCS | EUR 1.00
20 LB5736 700 PCS | EUR 1.00
";
        assert_eq!(po_size_breakdown(text).as_deref(), Some("500.00, 700.00"));
    }

    #[test]
    fn test_breakdown_from_items() {
        let items = vec![item("L", 1200.0), item("M", 12.5), item("XXL", 0.0), item("", 5.0), item("M", 2.0)];
        assert_eq!(
            breakdown_from_items(&items).as_deref(),
            Some("M-14.5, L-1200")
        );

        let other = vec![item("2T", 3.0), item("XS", 1.0)];
        assert_eq!(breakdown_from_items(&other).as_deref(), Some("XS-1, 2T-3"));
        assert_eq!(breakdown_from_items(&[]), None);
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(1000.0), "1000");
        assert_eq!(format_quantity(12.5), "12.5");
        assert_eq!(format_quantity(0.25), "0.25");
    }
}
