//! Purchase-order line items.

mod parser;

pub use parser::{detect_layout, extract_style_number, parse_line_items, size_from_line, PoLayout};
