//! Styled text fragments.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Span style flags as reported by the decoder.
    ///
    /// Bit positions follow the usual span flag layout of PDF text
    /// extractors: bit 4 (value 16) marks bold text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StyleFlags: u32 {
        const SUPERSCRIPT = 1;
        const ITALIC = 1 << 1;
        const SERIF = 1 << 2;
        const MONOSPACE = 1 << 3;
        const BOLD = 1 << 4;
    }
}

impl StyleFlags {
    /// Derive style flags from a font name such as `"ABCDEF+Helvetica-BoldOblique"`.
    pub fn from_font_name(font_name: &str) -> Self {
        let name = font_name.to_lowercase();
        let mut flags = StyleFlags::empty();

        if ["bold", "black", "heavy", "semibold", "demi"]
            .iter()
            .any(|marker| name.contains(marker))
        {
            flags |= StyleFlags::BOLD;
        }
        if name.contains("italic") || name.contains("oblique") {
            flags |= StyleFlags::ITALIC;
        }
        if name.contains("courier") || name.contains("mono") {
            flags |= StyleFlags::MONOSPACE;
        }
        if (name.contains("times") || name.contains("serif")) && !name.contains("sans") {
            flags |= StyleFlags::SERIF;
        }

        flags
    }
}

/// Bounding box in page space with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// One contiguous run of styled text, flattened out of the decoder's
/// page/block/line/span tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Trimmed, non-empty text
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Font size in points
    pub font_size: f32,

    /// Font name as reported by the decoder
    pub font_name: String,

    /// Whether the bold flag is set
    pub is_bold: bool,

    /// Raw style flags
    pub flags: StyleFlags,

    /// Position on the page
    pub bbox: BBox,

    /// Fill colour packed as `0xRRGGBB`
    pub color: u32,
}

impl Fragment {
    /// Create a regular-weight fragment with no font name or position.
    pub fn new(text: impl Into<String>, page: u32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            page,
            font_size,
            font_name: String::new(),
            is_bold: false,
            flags: StyleFlags::empty(),
            bbox: BBox::default(),
            color: 0,
        }
    }

    /// Set the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.flags.set(StyleFlags::BOLD, bold);
        self.is_bold = bold;
        self
    }

    /// Set the style flags; boldness follows bit 4.
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.is_bold = flags.contains(StyleFlags::BOLD);
        self.flags = flags;
        self
    }

    /// Set the font name.
    pub fn with_font_name(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Set the fill colour.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Whether the font size can take part in document statistics.
    ///
    /// Non-finite and non-positive sizes come from broken content streams.
    pub fn has_valid_size(&self) -> bool {
        self.font_size.is_finite() && self.font_size > 0.0
    }

    /// Text length in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
