// REST API routes for the setlist agent

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::{error, info};

use super::AppState;
use crate::agent::types::{TurnRequest, TurnResult};
use crate::error::AgentError;

const PROMPT_MIN_CHARS: usize = 5;
const PROMPT_MAX_CHARS: usize = 500;
const REFINEMENT_MAX_CHARS: usize = 500;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "epicset-agent",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Input constraints enforced ahead of the core. Returns the rejection
/// message for a bad request, None when the request may proceed.
pub(crate) fn boundary_error(request: &TurnRequest) -> Option<String> {
    let prompt_len = request.prompt.trim().chars().count();
    if !(PROMPT_MIN_CHARS..=PROMPT_MAX_CHARS).contains(&prompt_len) {
        return Some("Prompt must be between 5 and 500 characters.".to_string());
    }

    if let Some(refinement) = &request.refinement {
        let refinement_len = refinement.trim().chars().count();
        if !(1..=REFINEMENT_MAX_CHARS).contains(&refinement_len) {
            return Some("Refinement must be between 1 and 500 characters.".to_string());
        }
    }

    None
}

pub async fn generate_setlist(
    State(state): State<Arc<AppState>>,
    Json(mut request): Json<TurnRequest>,
) -> Result<Json<TurnResult>, (StatusCode, Json<ErrorResponse>)> {
    if let Some(message) = boundary_error(&request) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: message,
                message: None,
            }),
        ));
    }
    request.prompt = request.prompt.trim().to_string();

    // Library pre-fetch when configured and the caller sent none of its own.
    if request.library_tracks.is_none() {
        if let Some(library) = &state.library {
            let tracks = library
                .client
                .fetch(request.user_id.as_deref(), library.auth_token.as_deref())
                .await
                .map_err(turn_failure)?;
            info!(tracks = tracks.len(), "fetched user library");
            request.library_tracks = Some(tracks);
        }
    }

    let result = state.agent.run_turn(request).await.map_err(turn_failure)?;
    Ok(Json(result))
}

fn turn_failure(err: AgentError) -> (StatusCode, Json<ErrorResponse>) {
    error!(error = %err, "turn failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Failed to generate setlist".to_string(),
            message: Some(err.to_string()),
        }),
    )
}
