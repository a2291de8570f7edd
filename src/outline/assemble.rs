//! Ranking, deduplication and ordering of heading candidates.

use std::collections::HashSet;

use crate::model::{HeadingCandidate, OutlineEntry};

/// Sort candidates by descending rank score, earlier page first on ties.
///
/// The rank score is not floored at zero, so candidates far below the mean
/// font size still order among themselves. The sort is stable, so candidates
/// equal on both keys keep their input order.
pub fn rank(candidates: &mut [HeadingCandidate]) {
    candidates.sort_by(|a, b| {
        b.rank_score
            .total_cmp(&a.rank_score)
            .then_with(|| a.page.cmp(&b.page))
    });
}

/// Keep the first candidate of every `(lowercased text, page)` pair.
///
/// Run on ranked input this keeps the most confident duplicate on each page.
/// The same text on different pages is not a duplicate.
pub fn deduplicate(candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
    let mut seen: HashSet<(String, u32)> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|candidate| seen.insert((candidate.text.to_lowercase(), candidate.page)))
        .collect()
}

/// Build the final outline from a document's candidates.
///
/// Candidates are ranked, deduplicated, then stably re-sorted by page so
/// that entries on the same page stay in ranked order.
pub fn assemble_outline(mut candidates: Vec<HeadingCandidate>) -> Vec<OutlineEntry> {
    rank(&mut candidates);
    let mut unique = deduplicate(candidates);
    unique.sort_by_key(|candidate| candidate.page);
    unique.iter().map(HeadingCandidate::to_entry).collect()
}
