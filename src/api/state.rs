use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{PromptBuilder, RecommendationGenerator, Session};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub generator: Arc<dyn RecommendationGenerator>,
    pub prompts: Arc<PromptBuilder>,
}

/// Inner state that can be modified
///
/// Each session sits behind its own mutex: actions on one session run one
/// at a time, and sessions never block each other.
pub struct AppStateInner {
    pub sessions: HashMap<Uuid, Arc<Mutex<Session>>>,
}

impl AppState {
    /// Creates a new application state with no sessions
    pub fn new(generator: Arc<dyn RecommendationGenerator>, prompts: PromptBuilder) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                sessions: HashMap::new(),
            })),
            generator,
            prompts: Arc::new(prompts),
        }
    }

    /// Registers a fresh session and returns it
    pub async fn create_session(&self) -> Arc<Mutex<Session>> {
        let session = Session::new();
        let id = session.id;
        let session = Arc::new(Mutex::new(session));

        let mut inner = self.inner.write().await;
        inner.sessions.insert(id, session.clone());
        tracing::info!(session_id = %id, sessions = inner.sessions.len(), "Session created");

        session
    }

    /// Looks up a session by id
    pub async fn session(&self, id: Uuid) -> AppResult<Arc<Mutex<Session>>> {
        let inner = self.inner.read().await;
        inner
            .sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
    }

    /// Drops a session and everything it holds
    pub async fn remove_session(&self, id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.sessions.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Session {} not found", id)));
        }
        tracing::info!(session_id = %id, "Session removed");
        Ok(())
    }
}
