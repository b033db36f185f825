use std::collections::HashSet;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{normalize_title, ReadSet, Recommendation, RecommendationBatch, MAX_RECOMMENDATIONS},
};

/// Cleans raw generator candidates into a displayable batch.
///
/// Single pass in input order:
/// 1. Coerce `title`, `author` and `reason` to trimmed strings
/// 2. Drop candidates with an empty title
/// 3. Drop titles already in `read_set` (by normalized key)
/// 4. Drop repeats within this batch, keeping the first occurrence
///
/// The result is truncated to [`MAX_RECOMMENDATIONS`].
pub fn filter_recommendations(
    candidates: &Value,
    read_set: &ReadSet,
) -> AppResult<RecommendationBatch> {
    let candidates = candidates.as_array().ok_or_else(|| AppError::InvalidShape {
        raw: candidates.to_string(),
    })?;

    let read_keys = read_set.normalized_keys();
    let mut seen: HashSet<String> = HashSet::new();
    let mut batch = Vec::new();
    let mut dropped_read = 0usize;
    let mut dropped_duplicate = 0usize;

    for candidate in candidates {
        let title = field_text(candidate, "title");
        if title.is_empty() {
            continue;
        }

        let key = normalize_title(&title);
        if read_keys.contains(key.as_str()) {
            dropped_read += 1;
            continue;
        }
        if !seen.insert(key) {
            dropped_duplicate += 1;
            continue;
        }

        batch.push(Recommendation {
            title,
            author: field_text(candidate, "author"),
            reason: field_text(candidate, "reason"),
        });
    }

    let survivors = batch.len();
    batch.truncate(MAX_RECOMMENDATIONS);

    tracing::debug!(
        candidates = candidates.len(),
        dropped_read,
        dropped_duplicate,
        survivors,
        kept = batch.len(),
        "Recommendations filtered"
    );

    Ok(batch)
}

/// Reads `field` of a candidate as trimmed text.
///
/// Missing fields, `null` and non-object candidates give an empty string;
/// scalars are rendered in their textual form.
fn field_text(candidate: &Value, field: &str) -> String {
    match candidate.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn titles(batch: &[Recommendation]) -> Vec<&str> {
        batch.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_drops_read_titles_by_normalized_key() {
        let mut read_set = ReadSet::new();
        read_set.add("Dune");

        let candidates = json!([
            { "title": "dune" },
            { "title": "  DUNE  " },
            { "title": "Foundation" }
        ]);

        let batch = filter_recommendations(&candidates, &read_set).unwrap();
        assert_eq!(batch, vec![Recommendation::new("Foundation", "", "")]);
    }

    #[test]
    fn test_intra_batch_duplicates_first_wins() {
        let candidates = json!([
            { "title": "A", "author": "first" },
            { "title": "a", "author": "second" },
            { "title": "B" }
        ]);

        let batch = filter_recommendations(&candidates, &ReadSet::new()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], Recommendation::new("A", "first", ""));
        assert_eq!(batch[1].title, "B");
    }

    #[test]
    fn test_caps_to_ten_preserving_order() {
        let candidates: Vec<Value> = (1..=15)
            .map(|i| json!({ "title": format!("Book {}", i) }))
            .collect();

        let batch = filter_recommendations(&Value::Array(candidates), &ReadSet::new()).unwrap();
        assert_eq!(batch.len(), MAX_RECOMMENDATIONS);
        let expected: Vec<String> = (1..=10).map(|i| format!("Book {}", i)).collect();
        assert_eq!(titles(&batch), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_cap_applies_after_exclusion() {
        let mut read_set = ReadSet::new();
        read_set.add("Book 1");
        read_set.add("Book 2");

        let candidates: Vec<Value> = (1..=12)
            .map(|i| json!({ "title": format!("Book {}", i) }))
            .collect();

        let batch = filter_recommendations(&Value::Array(candidates), &read_set).unwrap();
        assert_eq!(batch.len(), 10);
        assert_eq!(batch[0].title, "Book 3");
        assert_eq!(batch[9].title, "Book 12");
    }

    #[test]
    fn test_drops_missing_and_blank_titles() {
        let candidates = json!([
            { "author": "Nobody" },
            { "title": "   ", "reason": "blank" },
            { "title": null },
            "just a string",
            42,
            { "title": "Solaris" }
        ]);

        let batch = filter_recommendations(&candidates, &ReadSet::new()).unwrap();
        assert_eq!(titles(&batch), vec!["Solaris"]);
    }

    #[test]
    fn test_trims_and_defaults_fields() {
        let candidates = json!([
            { "title": "  The Trial ", "author": " Franz Kafka ", "reason": "  Bleak.  ", "year": 1925 }
        ]);

        let batch = filter_recommendations(&candidates, &ReadSet::new()).unwrap();
        assert_eq!(
            batch,
            vec![Recommendation::new("The Trial", "Franz Kafka", "Bleak.")]
        );
    }

    #[test]
    fn test_coerces_non_string_scalars() {
        let candidates = json!([{ "title": 1984, "author": null, "reason": true }]);

        let batch = filter_recommendations(&candidates, &ReadSet::new()).unwrap();
        assert_eq!(batch, vec![Recommendation::new("1984", "", "true")]);
    }

    #[test]
    fn test_non_array_is_invalid_shape() {
        let candidates = json!({ "title": "Dune" });
        let result = filter_recommendations(&candidates, &ReadSet::new());
        assert!(matches!(result, Err(AppError::InvalidShape { .. })));

        let result = filter_recommendations(&json!("Dune"), &ReadSet::new());
        assert!(matches!(result, Err(AppError::InvalidShape { .. })));
    }

    #[test]
    fn test_empty_input() {
        let batch = filter_recommendations(&json!([]), &ReadSet::new()).unwrap();
        assert!(batch.is_empty());
    }
}
