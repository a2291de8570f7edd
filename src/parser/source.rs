//! Decoder-side span tree.
//!
//! Decoders report every page as blocks of lines of styled spans. This shape
//! stays on the decoder side of the boundary: [`crate::normalize`] flattens
//! it into [`crate::model::Fragment`]s before any heuristic sees it.

use crate::error::Result;
use crate::model::{BBox, StyleFlags};

/// A styled run of text as reported by a decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    /// Text exactly as decoded, whitespace included
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Style flags; bit 4 marks bold
    pub flags: StyleFlags,
    /// Position with the origin at the top-left corner of the page
    pub bbox: BBox,
    /// Fill colour packed as `0xRRGGBB`
    pub color: u32,
}

/// Spans sharing one baseline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLine {
    pub spans: Vec<RawSpan>,
}

/// A block of page content.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBlock {
    /// A text block (one `BT`..`ET` section)
    Text { lines: Vec<RawLine> },
    /// A non-text block; it carries no spans
    Image,
}

/// Anything that can produce the span tree of a document, page by page.
pub trait SpanSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Blocks of a page (1-indexed).
    fn page_blocks(&self, page: u32) -> Result<Vec<RawBlock>>;
}

impl<S: SpanSource + ?Sized> SpanSource for &S {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page_blocks(&self, page: u32) -> Result<Vec<RawBlock>> {
        (**self).page_blocks(page)
    }
}
