//! Token-set similarity for cleaned field values.

use std::collections::BTreeSet;

/// Order-insensitive token overlap score in `0..=100`.
///
/// Both strings are split on whitespace into token sets. When the shared
/// tokens cover one side completely the score is 100. Otherwise the best
/// normalized Levenshtein similarity among the sorted intersection and the
/// intersection extended by each side's leftover tokens is returned.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = join(tokens_a.intersection(&tokens_b));
    let diff_ab = join(tokens_a.difference(&tokens_b));
    let diff_ba = join(tokens_b.difference(&tokens_a));

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let combined_ab = concat(&intersection, &diff_ab);
    let combined_ba = concat(&intersection, &diff_ba);

    let mut best = ratio(&combined_ab, &combined_ba);
    if !intersection.is_empty() {
        best = best
            .max(ratio(&intersection, &combined_ab))
            .max(ratio(&intersection, &combined_ba));
    }
    best
}

fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn join<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn concat(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}
