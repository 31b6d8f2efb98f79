//! Axum route handlers for the document generation API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::JobState;
use crate::models::document::DocumentRequest;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub document_id: Uuid,
}

/// POST /generate
///
/// Starts background generation and returns the job id immediately.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    request.validate()?;

    let document_id = state
        .jobs
        .submit(request, Arc::clone(&state.llm), Arc::clone(&state.template));

    Ok(Json(GenerateResponse { document_id }))
}

/// GET /document/:id
///
/// 200 with the HTML once ready, 202 while pending, 404 for unknown ids,
/// 500 if generation failed.
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("Document ID not found".to_string());

    let id = Uuid::parse_str(&doc_id).map_err(|_| not_found())?;

    match state.jobs.get(&id).ok_or_else(not_found)? {
        JobState::Ready(document) => Ok(Html(document).into_response()),
        JobState::Pending => Ok((
            StatusCode::ACCEPTED,
            Json(json!({
                "status": "pending",
                "message": "Document generation in progress"
            })),
        )
            .into_response()),
        JobState::Failed(reason) => Err(AppError::GenerationFailed(reason)),
    }
}
