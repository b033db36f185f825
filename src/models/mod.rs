use serde::{Deserialize, Serialize};

pub mod read_set;
pub mod title;

pub use read_set::ReadSet;
pub use title::{goodreads_search_url, normalize_title};

/// Maximum number of recommendations held in one batch
pub const MAX_RECOMMENDATIONS: usize = 10;

/// A single book suggestion after cleaning.
///
/// `title` is never empty. `author` and `reason` may be empty; an empty
/// reason means the model gave no explanation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub reason: String,
}

impl Recommendation {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            reason: reason.into(),
        }
    }

    /// Comparison key of this recommendation's title
    pub fn key(&self) -> String {
        normalize_title(&self.title)
    }
}

/// Ordered batch of at most [`MAX_RECOMMENDATIONS`] entries
pub type RecommendationBatch = Vec<Recommendation>;

/// A recommendation as rendered to the user
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecommendationView {
    /// 1-based display position
    pub position: usize,
    pub title: String,
    pub author: String,
    /// `None` when the model gave no explanation
    pub reason: Option<String>,
    /// Title is already in the read set; the mark-as-read action is disabled
    pub already_read: bool,
    pub goodreads_url: String,
}

impl RecommendationView {
    /// Renders `recommendation`, evaluating read status against `read_set`
    pub fn render(position: usize, recommendation: &Recommendation, read_set: &ReadSet) -> Self {
        let reason = if recommendation.reason.is_empty() {
            None
        } else {
            Some(recommendation.reason.clone())
        };

        Self {
            position,
            title: recommendation.title.clone(),
            author: recommendation.author.clone(),
            reason,
            already_read: read_set.contains(&recommendation.title),
            goodreads_url: goodreads_search_url(&recommendation.title, &recommendation.author),
        }
    }
}

impl std::fmt::Display for RecommendationView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.position, self.title)?;
        if !self.author.is_empty() {
            write!(f, " ({})", self.author)?;
        }
        if self.already_read {
            write!(f, " [read]")?;
        }
        match &self.reason {
            Some(reason) => write!(f, "\n   {}", reason),
            None => write!(f, "\n   (no explanation given)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_key() {
        let rec = Recommendation::new("  The  Trial ", "Franz Kafka", "");
        assert_eq!(rec.key(), "the trial");
    }

    #[test]
    fn test_recommendation_deserialize_defaults() {
        let rec: Recommendation = serde_json::from_str(r#"{"title":"Dune"}"#).unwrap();
        assert_eq!(rec, Recommendation::new("Dune", "", ""));
    }

    #[test]
    fn test_view_marks_already_read() {
        let mut read_set = ReadSet::new();
        read_set.add("dune");

        let view = RecommendationView::render(1, &Recommendation::new("Dune", "", ""), &read_set);
        assert!(view.already_read);

        let view = RecommendationView::render(
            2,
            &Recommendation::new("Solaris", "Stanisław Lem", "Quiet, eerie"),
            &read_set,
        );
        assert!(!view.already_read);
        assert_eq!(view.reason.as_deref(), Some("Quiet, eerie"));
    }

    #[test]
    fn test_view_empty_reason_renders_distinctly() {
        let view = RecommendationView::render(
            3,
            &Recommendation::new("Anathem", "Neal Stephenson", ""),
            &ReadSet::new(),
        );
        assert_eq!(view.reason, None);
        assert_eq!(
            view.to_string(),
            "3. Anathem (Neal Stephenson)\n   (no explanation given)"
        );

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["reason"].is_null());
    }

    #[test]
    fn test_view_display_with_reason() {
        let mut read_set = ReadSet::new();
        read_set.add("Dune");
        let view = RecommendationView::render(
            1,
            &Recommendation::new("Dune", "", "Desert politics"),
            &read_set,
        );
        assert_eq!(view.to_string(), "1. Dune [read]\n   Desert politics");
    }
}
