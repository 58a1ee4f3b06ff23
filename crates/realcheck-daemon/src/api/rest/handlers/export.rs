//! Admin export handler

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, http::HeaderMap, Json};
use realcheck_types::StoredSelection;

/// Header carrying the admin password
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Export every stored selection in insertion order
pub async fn export_selections(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<StoredSelection>>> {
    let expected = state
        .admin_password
        .as_deref()
        .ok_or(ApiError::ExportDisabled)?;
    let provided = headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided != Some(expected) {
        tracing::warn!("Rejected export request");
        return Err(ApiError::Unauthorized);
    }

    let selections = state.engine.export_all().await?;
    tracing::info!(rows = selections.len(), "Exported selections");
    Ok(Json(selections))
}
