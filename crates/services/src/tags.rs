//! Tag derivation and merging.
//!
//! Baseline tags come mechanically from the filename and are always
//! available; vision-tagger output is merged in later, case-insensitively
//! deduplicated.

use std::collections::HashSet;

/// Derives baseline tags from a filename: strip the trailing extension,
/// split the stem on `-`, `_` and whitespace runs, drop empties, lowercase.
pub fn baseline_tags(filename: &str) -> Vec<String> {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => filename,
    };
    stem.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// Trims, lowercases, and drops empty entries. No other vocabulary
/// normalization is performed.
pub fn normalize(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Union of two tag lists, first-seen order, duplicates removed. Inputs are
/// normalized before comparison so `"Cat"` and `" cat "` collapse.
pub fn merge(baseline: Vec<String>, extra: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for tag in normalize(baseline).into_iter().chain(normalize(extra)) {
        if seen.insert(tag.clone()) {
            merged.push(tag);
        }
    }
    merged
}
