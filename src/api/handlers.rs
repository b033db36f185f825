use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tower_http::request_id::RequestId;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::SessionView;

use super::AppState;

/// File name of the read list download, whatever name it was imported under
pub const EXPORT_FILE_NAME: &str = "read.txt";

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ReadListResponse {
    pub titles: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub count: usize,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Create a new session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let session = state.create_session().await;
    let view = session.lock().await.view();
    (StatusCode::CREATED, Json(view))
}

/// Get a session's current state and recommendations
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state.session(id).await?;
    let view = session.lock().await.view();
    Ok(Json(view))
}

/// Delete a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.remove_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ask the generator for a new batch of recommendations
///
/// The session stays locked for the whole turn, generator call included.
pub async fn request_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request_id: Option<Extension<RequestId>>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<SessionView>> {
    let request_id = request_id
        .as_ref()
        .and_then(|Extension(id)| id.header_value().to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::info!(
        request_id = %request_id,
        session_id = %id,
        query_chars = request.query.chars().count(),
        "Processing recommendation request"
    );

    let session = state.session(id).await?;
    let mut session = session.lock().await;
    session
        .request_recommendations(state.generator.as_ref(), &state.prompts, &request.query)
        .await?;

    tracing::info!(request_id = %request_id, session_id = %id, "Recommendation request completed");

    Ok(Json(session.view()))
}

/// Current recommendations as plain text
pub async fn get_recommendations_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = state.session(id).await?;
    let body = session.lock().await.view().render_text();
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}

/// Start the session over: empty read list, no recommendations
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state.session(id).await?;
    let mut session = session.lock().await;
    session.reset();
    Ok(Json(session.view()))
}

/// Mark a title as read and drop it from the current batch
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MarkReadRequest>,
) -> AppResult<Json<SessionView>> {
    let session = state.session(id).await?;
    let mut session = session.lock().await;
    session.mark_read(&request.title)?;
    Ok(Json(session.view()))
}

/// List the read titles, sorted
pub async fn get_read_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReadListResponse>> {
    let session = state.session(id).await?;
    let session = session.lock().await;
    let titles = session.read_set().snapshot();
    Ok(Json(ReadListResponse {
        count: titles.len(),
        titles,
    }))
}

/// Replace the read list with an uploaded text file (one title per line)
pub async fn import_read_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> AppResult<Json<ImportResponse>> {
    let content = decode_upload(&body);
    let session = state.session(id).await?;
    let count = session.lock().await.import_read(&content);
    Ok(Json(ImportResponse { count }))
}

/// Empty the read list
pub async fn clear_read_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let session = state.session(id).await?;
    session.lock().await.clear_read();
    Ok(StatusCode::NO_CONTENT)
}

/// Download the read list as `read.txt`
pub async fn export_read_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = state.session(id).await?;
    let body = session.lock().await.export_read();
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        body,
    ))
}

/// Decodes an uploaded file as UTF-8, dropping invalid byte sequences
fn decode_upload(body: &[u8]) -> String {
    body.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
