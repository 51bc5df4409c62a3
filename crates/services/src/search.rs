//! Free-text matching over a user's visible images.
//!
//! Boolean match only, no ranking: a record survives iff every query token
//! hits the filename, an individual tag, or (as a phrase) the concatenation
//! of filename and tags. Candidate order is preserved.

use domains::ImageRecord;
use serde::Serialize;

/// Filtered listing plus its count, as returned to the UI layer.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub images: Vec<ImageRecord>,
    pub count: usize,
}

/// Lowercases the query and splits it on whitespace runs. An empty result
/// means "no filter" and is the caller's case to handle.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Applies the matcher to an already-restricted candidate set (visible
/// records of the requesting user, most-recent-first).
pub fn filter(candidates: Vec<ImageRecord>, tokens: &[String]) -> SearchResults {
    let images: Vec<ImageRecord> = candidates
        .into_iter()
        .filter(|record| matches(record, tokens))
        .collect();
    let count = images.len();
    SearchResults { images, count }
}

/// AND across tokens, OR across match kinds per token. The phrase clause (c)
/// is intentionally kept even though it overlaps (a) and (b): it is what
/// lets a multi-word query land inside the joined filename+tags text when no
/// single token check does.
fn matches(record: &ImageRecord, tokens: &[String]) -> bool {
    let filename = record.filename.to_lowercase();
    let tags: Vec<String> = record.tags.iter().map(|t| t.to_lowercase()).collect();
    let all_content = {
        let mut parts = Vec::with_capacity(tags.len() + 1);
        parts.push(filename.clone());
        parts.extend(tags.iter().cloned());
        parts.join(" ")
    };
    let phrase = tokens.join(" ");

    tokens.iter().all(|token| {
        filename.contains(token)
            || tags.iter().any(|tag| tag.contains(token))
            || all_content.contains(&phrase)
    })
}
