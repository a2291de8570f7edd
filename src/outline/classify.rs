//! Heading classification against document font statistics.

use crate::model::{Fragment, HeadingCandidate, HeadingLevel};

use super::clean::clean_text;
use super::pattern;

/// Text shorter than this is never a heading.
const MIN_HEADING_CHARS: usize = 3;

/// Text longer than this is never a heading.
const MAX_HEADING_CHARS: usize = 200;

/// Words that open body sentences far more often than headings.
const BODY_INDICATORS: &[&str] = &["the", "and", "that", "this", "with", "from"];

/// Document-wide font statistics.
///
/// Computed once per document before any fragment is classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentStats {
    /// Population mean of all well-formed font sizes
    pub avg_font_size: f64,
    /// Number of fragments that contributed to the mean
    pub sample_count: usize,
}

impl DocumentStats {
    /// Compute statistics, skipping fragments with a malformed font size.
    ///
    /// Returns `None` when no fragment has a usable size.
    pub fn from_fragments(fragments: &[Fragment]) -> Option<Self> {
        let (sum, count) = fragments
            .iter()
            .filter(|f| f.has_valid_size())
            .fold((0.0f64, 0usize), |(sum, count), f| {
                (sum + f64::from(f.font_size), count + 1)
            });

        if count == 0 {
            return None;
        }

        Some(Self {
            avg_font_size: sum / count as f64,
            sample_count: count,
        })
    }

    /// Font size of `fragment` relative to the document mean.
    pub fn size_ratio(&self, fragment: &Fragment) -> f64 {
        size_ratio(fragment, self.avg_font_size)
    }
}

fn size_ratio(fragment: &Fragment, avg_font_size: f64) -> f64 {
    f64::from(fragment.font_size) / avg_font_size
}

fn usable(fragment: &Fragment, avg_font_size: f64) -> bool {
    fragment.has_valid_size() && avg_font_size.is_finite() && avg_font_size > 0.0
}

/// Classify a fragment into a heading level, or `None` for non-headings.
///
/// Length and body-text filters run first; the remaining fragments go down a
/// ladder where the first matching rung wins.
pub fn classify(fragment: &Fragment, avg_font_size: f64) -> Option<HeadingLevel> {
    if !usable(fragment, avg_font_size) {
        return None;
    }

    let text = fragment.text.as_str();
    let len = text.chars().count();
    if !(MIN_HEADING_CHARS..=MAX_HEADING_CHARS).contains(&len) {
        return None;
    }
    if looks_like_body_text(text) {
        return None;
    }

    let ratio = size_ratio(fragment, avg_font_size);
    let score = pattern::score(text);
    let bold = fragment.is_bold;

    if ratio > 1.5 || score > 0.8 {
        Some(HeadingLevel::H1)
    } else if ratio > 1.2 || (bold && score > 0.5) {
        Some(HeadingLevel::H2)
    } else if ratio > 1.1 || (bold && score > 0.3) {
        Some(HeadingLevel::H3)
    } else if bold && looks_like_heading(text) {
        Some(HeadingLevel::H3)
    } else {
        None
    }
}

/// Blended heading score of `fragment`, capped at 1.0 but not floored.
///
/// Font size excess over the mean is weighted double and capped, bold adds a
/// fixed bonus, the pattern score contributes half its value, and headings
/// near the front of the document get up to 0.2 more. Fragments much smaller
/// than the mean score below zero. `None` when the size or mean is unusable.
pub fn blended_score(fragment: &Fragment, avg_font_size: f64) -> Option<f64> {
    if !usable(fragment, avg_font_size) {
        return None;
    }

    let mut score = 0.0;
    score += (size_ratio(fragment, avg_font_size) - 1.0).min(0.5) * 2.0;
    if fragment.is_bold {
        score += 0.3;
    }
    score += pattern::score(&fragment.text) * 0.5;
    let page_factor = (1.0 - (f64::from(fragment.page) - 1.0) * 0.1).max(0.0);
    score += page_factor * 0.2;

    Some(score.min(1.0))
}

/// Heuristic confidence in `[0.0, 1.0]` that `fragment` is a real heading.
///
/// The [`blended_score`] clamped to the unit range. Independent of the level
/// decision.
pub fn confidence(fragment: &Fragment, avg_font_size: f64) -> f64 {
    blended_score(fragment, avg_font_size)
        .map(|score| score.clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// Whether `text` reads like running prose rather than a heading.
pub fn looks_like_body_text(text: &str) -> bool {
    if text.chars().count() > 100 && text.contains('.') {
        return true;
    }
    if text.matches('.').count() > 1 {
        return true;
    }

    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    words.len() > 5
        && words
            .iter()
            .take(3)
            .any(|word| BODY_INDICATORS.contains(word))
}

/// Whether `text` has the shape of a heading.
///
/// Either a short run of capitalized words, or a capitalized phrase that
/// does not end like a sentence.
pub fn looks_like_heading(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= 6 && words.iter().all(|word| starts_upper(word)) {
        return true;
    }

    starts_upper(text) && !text.ends_with(['.', '!', '?'])
}

fn starts_upper(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

/// Classify every fragment of a document and return the accepted ones.
///
/// Candidate text is cleaned; fragments whose cleaned text is empty are
/// dropped. An empty document, or one without any usable font size, yields
/// no candidates.
pub fn detect_headings(fragments: &[Fragment]) -> Vec<HeadingCandidate> {
    let Some(stats) = DocumentStats::from_fragments(fragments) else {
        return Vec::new();
    };

    log::debug!(
        "Classifying {} fragments against mean font size {:.2}",
        fragments.len(),
        stats.avg_font_size
    );

    fragments
        .iter()
        .filter_map(|fragment| {
            let level = classify(fragment, stats.avg_font_size)?;
            let text = clean_text(&fragment.text);
            if text.is_empty() {
                return None;
            }
            let rank_score = blended_score(fragment, stats.avg_font_size)?;
            Some(HeadingCandidate {
                level,
                text,
                page: fragment.page,
                font_size: fragment.font_size,
                confidence: rank_score.clamp(0.0, 1.0),
                rank_score,
            })
        })
        .collect()
}
