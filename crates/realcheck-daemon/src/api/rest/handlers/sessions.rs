//! Session handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use realcheck_engine::{ConfirmOutcome, SessionStatus};
use realcheck_types::{SampledExample, Slot, UserId, Utterance};
use serde::{Deserialize, Serialize};

/// Create session response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub user_id: String,
}

/// Session status response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub user_id: String,
    pub round_count: u32,
    pub rounds_total: u32,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_code: Option<String>,
}

impl SessionStatusResponse {
    fn new(status: SessionStatus, state: &AppState) -> Self {
        Self {
            user_id: status.user_id.to_string(),
            round_count: status.round_count,
            rounds_total: status.rounds_total,
            completed: status.completed,
            completion_code: state.completion_code_for(status.completed),
        }
    }
}

/// One side of the screen. Only the script is exposed.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScriptView {
    pub script: Vec<Utterance>,
}

impl From<&SampledExample> for ScriptView {
    fn from(sampled: &SampledExample) -> Self {
        Self {
            script: sampled.example.script.clone(),
        }
    }
}

/// Current pair response
#[derive(Debug, Serialize, Deserialize)]
pub struct PairResponse {
    /// 1-based round number
    pub round: u32,
    pub left: ScriptView,
    pub right: ScriptView,
}

/// Confirm request
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub choice: Option<Slot>,
}

/// Confirm response
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmResponse {
    /// `false` when the session had already completed
    pub recorded: bool,
    pub round_count: u32,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_code: Option<String>,
}

/// Start a new session
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let user_id = state.engine.start_session().await;
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            user_id: user_id.to_string(),
        }),
    )
}

/// Get session status
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionStatusResponse>> {
    let status = state.engine.status(&UserId::new(id)).await?;
    Ok(Json(SessionStatusResponse::new(status, &state)))
}

/// Get the pair to show. Only sessions created by `create_session` exist.
pub async fn get_pair(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PairResponse>> {
    let user_id = UserId::new(id);
    let pending = state
        .engine
        .current_round(&user_id)
        .await?
        .ok_or_else(|| ApiError::SessionCompleted(user_id.to_string()))?;

    Ok(Json(PairResponse {
        round: pending.round,
        left: ScriptView::from(pending.pair.left()),
        right: ScriptView::from(pending.pair.right()),
    }))
}

/// Confirm the participant's choice
pub async fn confirm_selection(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ConfirmRequest>,
) -> ApiResult<Json<ConfirmResponse>> {
    let outcome = state
        .engine
        .confirm(&UserId::new(id), request.choice)
        .await?;

    let completed = outcome.is_completed();
    Ok(Json(ConfirmResponse {
        recorded: matches!(outcome, ConfirmOutcome::Recorded { .. }),
        round_count: outcome.round_count(),
        completed,
        completion_code: state.completion_code_for(completed),
    }))
}

/// End a session and discard its state
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionStatusResponse>> {
    let status = state.engine.end_session(&UserId::new(id)).await?;
    Ok(Json(SessionStatusResponse::new(status, &state)))
}
