use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{normalize_title, ReadSet, RecommendationBatch, RecommendationView},
    services::{
        prompt::PromptBuilder,
        providers::RecommendationGenerator,
        recommendations::filter_recommendations,
        response_parser::{parse_response, recommendations_field},
    },
};

/// Where a session is in its request cycle
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    /// No request made yet, or the session was reset
    Idle,
    /// A generator call is in flight
    Requesting,
    /// The latest request produced the current batch
    Displaying,
    /// The latest request failed; the previous batch is still held.
    /// `raw` is the unparsed generator output when there was one.
    Failed {
        message: String,
        raw: Option<String>,
    },
}

/// Per-user recommendation session
///
/// Owns the read set and the current batch. Every action takes `&mut self`,
/// so one action completes before the next is applied.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    read_set: ReadSet,
    batch: RecommendationBatch,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Rendered state of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub status: SessionStatus,
    pub recommendations: Vec<RecommendationView>,
    pub read_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionView {
    /// Plain-text listing of the batch, one numbered entry per recommendation
    pub fn render_text(&self) -> String {
        self.recommendations
            .iter()
            .map(|rec| format!("{}\n", rec))
            .collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            read_set: ReadSet::new(),
            batch: Vec::new(),
            status: SessionStatus::Idle,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn read_set(&self) -> &ReadSet {
        &self.read_set
    }

    pub fn batch(&self) -> &RecommendationBatch {
        &self.batch
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Asks the generator for recommendations and replaces the batch.
    ///
    /// The generator is called exactly once. On any failure the session
    /// enters `Failed` and the previous batch is left untouched.
    pub async fn request_recommendations(
        &mut self,
        generator: &dyn RecommendationGenerator,
        prompts: &PromptBuilder,
        query: &str,
    ) -> AppResult<&RecommendationBatch> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput("Query cannot be empty".to_string()));
        }

        let prompt = prompts.build(query, &self.read_set);

        tracing::info!(
            session_id = %self.id,
            generator = generator.name(),
            read_count = self.read_set.len(),
            "Requesting recommendations"
        );

        let generated = {
            let turn = PendingTurn::begin(self);
            let generated = generator.generate(&prompt).await;
            turn.settle();
            generated
        };

        let outcome = match generated {
            Ok(raw) => self.accept_response(&raw),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(batch) => {
                tracing::info!(
                    session_id = %self.id,
                    recommendations = batch.len(),
                    "Recommendations ready"
                );
                self.batch = batch;
                self.transition(SessionStatus::Displaying);
                Ok(&self.batch)
            }
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "Recommendation request failed");
                self.transition(SessionStatus::Failed {
                    message: e.to_string(),
                    raw: e.raw().map(str::to_string),
                });
                Err(e)
            }
        }
    }

    /// Parses and filters one generator answer against the current read set
    fn accept_response(&self, raw: &str) -> AppResult<RecommendationBatch> {
        let value = parse_response(raw)?;
        let candidates = recommendations_field(&value, raw)?;
        // Shape errors report the generator's text, not the extracted list
        filter_recommendations(&candidates, &self.read_set).map_err(|e| match e {
            AppError::InvalidShape { .. } => AppError::InvalidShape {
                raw: raw.to_string(),
            },
            other => other,
        })
    }

    /// Marks a title as read: adds it to the read set and removes every
    /// matching entry from the current batch.
    ///
    /// Returns the number of batch entries removed.
    pub fn mark_read(&mut self, title: &str) -> AppResult<usize> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }

        let key = normalize_title(title);
        let before = self.batch.len();
        self.read_set.add(title);
        self.batch.retain(|entry| entry.key() != key);
        let removed = before - self.batch.len();
        self.touch();

        tracing::info!(
            session_id = %self.id,
            title = %title,
            removed,
            read_count = self.read_set.len(),
            "Marked as read"
        );

        Ok(removed)
    }

    /// Empties the read set; the current batch is kept as is
    pub fn clear_read(&mut self) {
        self.read_set.clear();
        self.touch();
        tracing::info!(session_id = %self.id, "Read list cleared");
    }

    /// Replaces the read set with the titles in `raw_text`, returning the new size
    pub fn import_read(&mut self, raw_text: &str) -> usize {
        self.read_set.load_or_replace(raw_text);
        self.touch();
        tracing::info!(
            session_id = %self.id,
            read_count = self.read_set.len(),
            "Read list imported"
        );
        self.read_set.len()
    }

    /// Body of the `read.txt` download
    pub fn export_read(&self) -> String {
        self.read_set.export()
    }

    /// Drops the read set and batch, keeping the session id
    pub fn reset(&mut self) {
        self.read_set.clear();
        self.batch.clear();
        self.transition(SessionStatus::Idle);
        tracing::info!(session_id = %self.id, "Session reset");
    }

    /// Renders the session, evaluating read status against the current read set
    pub fn view(&self) -> SessionView {
        let recommendations = self
            .batch
            .iter()
            .enumerate()
            .map(|(idx, rec)| RecommendationView::render(idx + 1, rec, &self.read_set))
            .collect();

        SessionView {
            id: self.id,
            status: self.status.clone(),
            recommendations,
            read_count: self.read_set.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn transition(&mut self, status: SessionStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Holds a session in `Requesting` while the generator call is in flight.
///
/// Dropping an unsettled turn (the caller's future was cancelled) puts the
/// session back in the status it had before the request.
struct PendingTurn<'a> {
    session: &'a mut Session,
    previous: Option<SessionStatus>,
}

impl<'a> PendingTurn<'a> {
    fn begin(session: &'a mut Session) -> Self {
        let previous = std::mem::replace(&mut session.status, SessionStatus::Requesting);
        session.touch();
        Self {
            session,
            previous: Some(previous),
        }
    }

    fn settle(mut self) {
        self.previous = None;
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            tracing::warn!(session_id = %self.session.id, "Recommendation request cancelled");
            self.session.transition(previous);
        }
    }
}
