//! Title detection from front-matter font size dominance.

use crate::model::{DocumentResult, Fragment};

use super::clean::clean_text;

/// Only fragments on pages `1..=TITLE_PAGE_LIMIT` can become the title.
pub const TITLE_PAGE_LIMIT: u32 = 2;

/// Font sizes closer than this are treated as equal.
pub const SIZE_EPSILON: f32 = 1e-6;

/// A max-size fragment needs more characters than this to be a title.
const MIN_TITLE_CHARS: usize = 3;

/// Fallback title candidates need more characters than this.
const MIN_FALLBACK_CHARS: usize = 10;

/// Pick a title for the document.
///
/// Among the well-formed fragments of the first two pages, the longest one
/// set in the largest font wins; the first of several equally long ones is
/// kept. When none qualifies the first reasonably long fragment is used, and
/// failing that the `"Untitled Document"` placeholder.
pub fn detect_title(fragments: &[Fragment]) -> String {
    let front: Vec<&Fragment> = fragments
        .iter()
        .filter(|f| f.page <= TITLE_PAGE_LIMIT && f.has_valid_size())
        .collect();

    let Some(max_size) = front.iter().map(|f| f.font_size).reduce(f32::max) else {
        return DocumentResult::UNTITLED.to_string();
    };

    let mut best: Option<(&Fragment, usize)> = None;
    for fragment in &front {
        if (fragment.font_size - max_size).abs() > SIZE_EPSILON {
            continue;
        }
        let len = fragment.char_count();
        if len <= MIN_TITLE_CHARS {
            continue;
        }
        if best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((fragment, len));
        }
    }

    let chosen = best.map(|(fragment, _)| fragment).or_else(|| {
        front
            .iter()
            .copied()
            .find(|f| f.char_count() > MIN_FALLBACK_CHARS)
    });

    chosen
        .map(|fragment| clean_text(&fragment.text))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DocumentResult::UNTITLED.to_string())
}
