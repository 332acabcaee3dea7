use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
}

/// Liveness plus a check that the store root is still a readable directory.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let root = &state.store.config().store_root;

    let (status, storage) = match tokio::fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => (StatusCode::OK, "healthy".to_string()),
        Ok(_) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy: not a directory".to_string()),
        Err(e) => {
            tracing::error!(root = %root.display(), error = %e, "Storage health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, format!("unhealthy: {}", e))
        }
    };

    let response = HealthCheckResponse {
        status: if status.is_success() { "healthy" } else { "unhealthy" }.to_string(),
        storage,
    };

    (status, Json(response))
}
