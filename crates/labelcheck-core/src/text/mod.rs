//! Text normalization and lexical similarity.

mod fuzzy;
mod normalize;

pub use fuzzy::token_set_ratio;
pub use normalize::{normalize, normalize_then_clean, preprocess};
