//! Title and heading heuristics.
//!
//! The whole module is a pure function of one document's fragments:
//!
//! ```
//! use pdfoutline::model::Fragment;
//! use pdfoutline::outline::extract_outline;
//!
//! let fragments = vec![
//!     Fragment::new("Annual Report", 1, 24.0),
//!     Fragment::new("INTRODUCTION", 1, 16.0).with_bold(true),
//!     Fragment::new("some body text", 1, 10.0),
//! ];
//! let result = extract_outline(&fragments);
//! assert_eq!(result.title, "Annual Report");
//! ```
//!
//! Nothing is shared between documents, so callers may run it for many
//! documents in parallel.

mod assemble;
mod classify;
mod clean;
pub mod pattern;
mod title;

pub use assemble::{assemble_outline, deduplicate, rank};
pub use classify::{
    blended_score, classify, confidence, detect_headings, looks_like_body_text, looks_like_heading,
    DocumentStats,
};
pub use clean::clean_text;
pub use title::{detect_title, TITLE_PAGE_LIMIT};

use crate::model::{DocumentResult, Fragment};

/// Compute the title and outline of one document.
pub fn extract_outline(fragments: &[Fragment]) -> DocumentResult {
    let title = detect_title(fragments);
    let candidates = detect_headings(fragments);
    let candidate_count = candidates.len();
    let outline = assemble_outline(candidates);

    log::debug!(
        "Outline: {} fragments, {} candidates, {} entries, title {:?}",
        fragments.len(),
        candidate_count,
        outline.len(),
        title
    );

    DocumentResult::new(title, outline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    #[test]
    fn test_empty_document() {
        let result = extract_outline(&[]);
        assert_eq!(result, DocumentResult::untitled());
    }

    #[test]
    fn test_single_large_heading() {
        let fragments = vec![
            Fragment::new("INTRODUCTION", 1, 24.0).with_bold(true),
            Fragment::new("body", 1, 8.0),
            Fragment::new("more", 1, 8.0),
            Fragment::new("text", 1, 8.0),
        ];
        let result = extract_outline(&fragments);
        assert_eq!(result.title, "INTRODUCTION");
        assert_eq!(result.outline.len(), 1);
        assert_eq!(result.outline[0].level, HeadingLevel::H1);
        assert_eq!(result.outline[0].text, "INTRODUCTION");
        assert_eq!(result.outline[0].page, 1);
    }
}
