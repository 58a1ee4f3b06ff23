//! Health handler

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub active_sessions: usize,
    pub corpus: CorpusSizes,
}

#[derive(Debug, Serialize)]
pub struct CorpusSizes {
    pub real: usize,
    pub synthetic: usize,
    pub curated: usize,
}

/// Health check endpoint. Reports `degraded` while a general pool is empty.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let corpus = state.engine.corpus();
    let sizes = CorpusSizes {
        real: corpus.real_len(),
        synthetic: corpus.synthetic_len(),
        curated: corpus.curated_len(),
    };
    let status = if sizes.real == 0 || sizes.synthetic == 0 {
        "degraded"
    } else {
        "healthy"
    };

    Json(HealthCheckResponse {
        status: status.to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        active_sessions: state.engine.sessions().len().await,
        corpus: sizes,
    })
}
