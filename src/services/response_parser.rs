use serde_json::Value;

use crate::error::{AppError, AppResult};

const FENCE: &str = "```";

/// Parses generator output into JSON.
///
/// The text may be wrapped in a fenced code block, optionally opened with a
/// language tag line (```` ```json ````). On failure the error carries the
/// original text so it can be shown to the user.
pub fn parse_response(raw: &str) -> AppResult<Value> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|source| AppError::Parse {
        raw: raw.to_string(),
        source,
    })
}

/// Returns the `recommendations` member of a parsed response.
///
/// A missing member is an empty list. A response that is not a JSON object
/// has no usable shape.
pub fn recommendations_field(value: &Value, raw: &str) -> AppResult<Value> {
    match value {
        Value::Object(map) => Ok(map
            .get("recommendations")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()))),
        _ => Err(AppError::InvalidShape {
            raw: raw.to_string(),
        }),
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed;
    }

    let inner = trimmed.trim_matches('`').trim();
    match inner.split_once('\n') {
        Some((first_line, rest)) if is_language_tag(first_line) => rest.trim(),
        _ => inner,
    }
}

fn is_language_tag(line: &str) -> bool {
    let line = line.trim_end();
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        let value = parse_response(r#"{"recommendations":[]}"#).unwrap();
        assert_eq!(value, json!({ "recommendations": [] }));
    }

    #[test]
    fn test_fenced_and_plain_parse_identically() {
        let fenced = parse_response("```json\n{\"recommendations\":[]}\n```").unwrap();
        let plain = parse_response("{\"recommendations\":[]}").unwrap();
        assert_eq!(fenced, plain);
    }

    #[test]
    fn test_fence_without_language_tag() {
        let value = parse_response("```\n{\"a\": 1}\n```").unwrap();
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[test]
    fn test_language_tag_is_case_insensitive() {
        let value = parse_response("  ```JSON\r\n{\"a\": 1}\r\n```  ").unwrap();
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[test]
    fn test_surrounding_whitespace() {
        let value = parse_response("\n\n   {\"a\": [1, 2]}   \n").unwrap();
        assert_eq!(value, json!({ "a": [1, 2] }));
    }

    #[test]
    fn test_invalid_json_keeps_original_raw() {
        let raw = "```json\nSorry, I can't help with that.\n```";
        match parse_response(raw) {
            Err(AppError::Parse { raw: kept, .. }) => assert_eq!(kept, raw),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_prose_is_a_parse_error() {
        assert!(matches!(
            parse_response("Here are some books you might like"),
            Err(AppError::Parse { .. })
        ));
    }

    #[test]
    fn test_recommendations_field_present() {
        let value = json!({ "recommendations": [{ "title": "Dune" }] });
        let field = recommendations_field(&value, "raw").unwrap();
        assert_eq!(field, json!([{ "title": "Dune" }]));
    }

    #[test]
    fn test_recommendations_field_missing_is_empty() {
        let field = recommendations_field(&json!({ "books": [] }), "raw").unwrap();
        assert_eq!(field, json!([]));
    }

    #[test]
    fn test_recommendations_field_non_object() {
        let result = recommendations_field(&json!([1, 2, 3]), "[1, 2, 3]");
        match result {
            Err(AppError::InvalidShape { raw }) => assert_eq!(raw, "[1, 2, 3]"),
            other => panic!("expected invalid shape, got {:?}", other),
        }
    }
}
