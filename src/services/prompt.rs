use crate::models::{ReadSet, MAX_RECOMMENDATIONS};

/// Placeholder sent to the model when nothing has been read yet
pub const EMPTY_READ_LIST: &str = "(empty)";

/// Language of the "reason" fields unless configured otherwise
pub const DEFAULT_REASON_LANGUAGE: &str = "Turkish";

/// Builds the recommendation prompt sent to the generator
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    reason_language: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_REASON_LANGUAGE)
    }
}

impl PromptBuilder {
    pub fn new(reason_language: impl Into<String>) -> Self {
        Self {
            reason_language: reason_language.into(),
        }
    }

    /// The read-list context: sorted titles one per line, or [`EMPTY_READ_LIST`]
    pub fn read_list_context(read_set: &ReadSet) -> String {
        if read_set.is_empty() {
            EMPTY_READ_LIST.to_string()
        } else {
            read_set.titles().join("\n")
        }
    }

    pub fn build(&self, query: &str, read_set: &ReadSet) -> String {
        format!(
            r#"Write every "reason" in {language}.
You are a book recommendation assistant.

User request:
{question}

Books the user has already read (NEVER recommend these):
{read_list}

Goal:
- Recommend EXACTLY {count} books that match the user's request.
- Do not confine the picks to one region; draw on world literature.
- Avoid the books already read and titles very similar to them.
- For each book write one CONCRETE sentence explaining why it was recommended
  (tie it to at least one of: theme, length, genre, tone, narrative style).

Below is ONE EXAMPLE of the format and reasoning style only (DO NOT REPEAT IT):

{{
  "recommendations": [
    {{
      "title": "Anathem",
      "author": "Neal Stephenson",
      "reason": "Its philosophical, idea-driven structure explores the search for meaning inside a science-fiction frame, which suits the user's questioning theme."
    }}
  ]
}}

NOW PRODUCE THE REAL OUTPUT:
- Do NOT repeat the example above
- Answer ONLY in the JSON format below
- "recommendations" must contain EXACTLY {count} entries
- Every "reason" must be filled in

JSON FORMAT:
{{
  "recommendations": [
    {{"title": "Book Title", "author": "Author Name", "reason": "one-sentence reason"}},
    ...
  ]
}}
"#,
            language = self.reason_language,
            question = query.trim(),
            read_list = Self::read_list_context(read_set),
            count = MAX_RECOMMENDATIONS,
        )
    }
}
