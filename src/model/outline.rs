//! Heading candidates and the persisted outline record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse heading depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// The label used in serialized outlines.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }

    /// Numeric depth (1 for H1).
    pub fn depth(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fragment accepted as a heading, before deduplication.
///
/// Scores are only comparable between candidates of the same document.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
    pub font_size: f32,
    /// Heading confidence in `[0.0, 1.0]`
    pub confidence: f64,
    /// Blended score before the lower clamp; orders duplicates
    pub rank_score: f64,
}

impl HeadingCandidate {
    /// Project to the persisted outline shape.
    pub fn to_entry(&self) -> OutlineEntry {
        OutlineEntry {
            level: self.level,
            text: self.text.clone(),
            page: self.page,
        }
    }
}

/// One line of the final outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// Title and outline of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl DocumentResult {
    /// Title used when no fragment qualifies.
    pub const UNTITLED: &'static str = "Untitled Document";

    /// Title written for documents that could not be decoded.
    pub const FAILED: &'static str = "Error: Could not process document";

    /// Create a result.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Result of a document with no usable text.
    pub fn untitled() -> Self {
        Self::new(Self::UNTITLED, Vec::new())
    }

    /// Placeholder persisted in place of a document that failed to decode.
    pub fn failed() -> Self {
        Self::new(Self::FAILED, Vec::new())
    }

    /// Check if the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}
