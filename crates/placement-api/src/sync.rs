use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use placement_types::Collection;

use crate::error::ApiError;
use crate::state::AppState;

/// Reload every collection. Joins a refresh already in flight.
pub async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.store.refresh_all().await;
    if !report.is_clean() {
        info!("Manual refresh finished with {} failures", report.failed.len());
    }
    Json(report)
}

pub async fn dismiss_notice(
    State(state): State<AppState>,
    Path(collection): Path<Collection>,
) -> Result<impl IntoResponse, ApiError> {
    if state.store.dismiss_issue(collection).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("no notice for {}", collection)))
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let loading = state.store.is_loading().await;
    Json(json!({ "status": "ok", "loading": loading }))
}
