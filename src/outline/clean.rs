//! Text cleaning shared by title and heading detection.

/// Leading list markers removed from titles and headings.
///
/// `â€¢` is a UTF-8 bullet read back as Windows-1252 and U+F0B7 is the
/// bullet of the Symbol font's private-use mapping.
const BULLET_MARKERS: &[&str] = &["•", "-", "*", "â€¢", "\u{F0B7}"];

/// Collapse whitespace runs to single spaces, trim, and strip leading
/// bullet or dash markers.
///
/// Markers are stripped for as long as one still leads the text, which keeps
/// `clean_text(clean_text(s)) == clean_text(s)`.
pub fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut rest = collapsed.as_str();
    while let Some(stripped) = strip_marker(rest) {
        rest = stripped.trim_start();
    }

    rest.to_string()
}

fn strip_marker(text: &str) -> Option<&str> {
    BULLET_MARKERS
        .iter()
        .find_map(|marker| text.strip_prefix(marker))
}
