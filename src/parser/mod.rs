//! PDF decoding module.

mod options;
mod pdf_source;
mod source;

pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use pdf_source::PdfSource;
pub use source::{RawBlock, RawLine, RawSpan, SpanSource};
