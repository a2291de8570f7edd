//! Flattening of decoder span trees into fragments.

use crate::error::Result;
use crate::model::Fragment;
use crate::parser::{ErrorMode, ParseOptions, RawBlock, RawSpan, SpanSource};

/// Flatten one page's blocks into fragments, in reading order.
///
/// Spans whose text is empty after trimming whitespace are skipped. Nothing
/// else is filtered and the text is not otherwise normalized.
pub fn normalize_page(page: u32, blocks: &[RawBlock]) -> Vec<Fragment> {
    blocks
        .iter()
        .filter_map(|block| match block {
            RawBlock::Text { lines } => Some(lines),
            RawBlock::Image => None,
        })
        .flatten()
        .flat_map(|line| line.spans.iter())
        .filter_map(|span| to_fragment(page, span))
        .collect()
}

fn to_fragment(page: u32, span: &RawSpan) -> Option<Fragment> {
    let text = span.text.trim();
    if text.is_empty() {
        return None;
    }

    Some(
        Fragment::new(text, page, span.font_size)
            .with_font_name(span.font_name.as_str())
            .with_flags(span.flags)
            .with_bbox(span.bbox)
            .with_color(span.color),
    )
}

/// Decode the selected pages of a source into one page-ordered sequence.
///
/// In strict mode the first page error is returned. In lenient mode the
/// page is logged and skipped.
pub fn extract_fragments<S: SpanSource>(source: &S, options: &ParseOptions) -> Result<Vec<Fragment>> {
    let page_count = source.page_count();
    let mut fragments = Vec::new();

    for page in (1..=page_count).filter(|&page| options.pages.includes(page)) {
        match source.page_blocks(page) {
            Ok(blocks) => fragments.extend(normalize_page(page, &blocks)),
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping page {}: {}", page, e);
            }
            Err(e) => return Err(e),
        }
    }

    log::debug!(
        "Normalized {} fragments from {} pages",
        fragments.len(),
        page_count
    );

    Ok(fragments)
}
