//! # pdfoutline
//!
//! Title and heading outline extraction for PDF documents.
//!
//! A document is decoded into styled text fragments, and a set of layout and
//! text heuristics picks its title and its H1/H2/H3 headings. The result
//! serializes to `{"title": ..., "outline": [{"level", "text", "page"}]}`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{outline_file, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let result = outline_file("document.pdf")?;
//!     println!("{}", render::to_json(&result, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`parser`]: lopdf-backed decoder producing a page/block/line/span tree
//! - [`normalize`]: flattens that tree into [`Fragment`]s
//! - [`outline`]: title detection, heading classification and assembly
//! - [`batch`]: directory-to-directory processing with per-document isolation

pub mod batch;
pub mod error;
pub mod model;
pub mod normalize;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{run_batch, BatchOptions, BatchReport, DocumentReport};
pub use error::{Error, Result};
pub use model::{
    BBox, DocumentResult, Fragment, HeadingCandidate, HeadingLevel, OutlineEntry, StyleFlags,
};
pub use normalize::extract_fragments;
pub use outline::extract_outline;
pub use parser::{ErrorMode, PageSelection, ParseOptions, PdfSource, SpanSource};
pub use render::JsonFormat;

use std::path::Path;

/// Compute the outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::outline_file;
///
/// let result = outline_file("document.pdf").unwrap();
/// for entry in &result.outline {
///     println!("{} {} (page {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<DocumentResult> {
    outline_file_with_options(path, &ParseOptions::default())
}

/// Compute the outline of a PDF file with custom decoding options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{outline_file_with_options, PageSelection, ParseOptions};
///
/// let options = ParseOptions::new()
///     .lenient()
///     .with_pages(PageSelection::Range(1..=5));
/// let result = outline_file_with_options("document.pdf", &options).unwrap();
/// ```
pub fn outline_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ParseOptions,
) -> Result<DocumentResult> {
    let source = PdfSource::open(path)?;
    let fragments = extract_fragments(&source, options)?;
    Ok(extract_outline(&fragments))
}

/// Compute the outline of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::outline_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let result = outline_bytes(&data).unwrap();
/// ```
pub fn outline_bytes(data: &[u8]) -> Result<DocumentResult> {
    let source = PdfSource::from_bytes(data)?;
    let fragments = extract_fragments(&source, &ParseOptions::default())?;
    Ok(extract_outline(&fragments))
}

/// Compute the outline of already decoded fragments.
///
/// Never fails: an empty slice gives the untitled placeholder.
pub fn outline_fragments(fragments: &[Fragment]) -> DocumentResult {
    extract_outline(fragments)
}
