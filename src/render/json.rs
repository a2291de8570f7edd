//! JSON rendering for outline results.

use crate::error::{Error, Result};
use crate::model::DocumentResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a document result as `{"title": ..., "outline": [...]}`.
pub fn to_json(result: &DocumentResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};

    fn sample() -> DocumentResult {
        DocumentResult::new(
            "Annual Report",
            vec![OutlineEntry {
                level: HeadingLevel::H1,
                text: "Introduction".to_string(),
                page: 2,
            }],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Annual Report\""));
        assert!(json.contains("\"level\": \"H1\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Annual Report","outline":[{"level":"H1","text":"Introduction","page":2}]}"#
        );
    }

    #[test]
    fn test_failed_result_shape() {
        let json = to_json(&DocumentResult::failed(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Error: Could not process document","outline":[]}"#
        );
    }
}
