use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::Credentials;
use crate::error::{ApiError, HttpAppError};
use crate::state::AppState;

/// Reject the request with 401 unless the authorizer accepts its credentials.
///
/// An unreachable identity backend also yields 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let credentials = Credentials::from_headers(request.headers());

    match state.authorizer.authorize(&credentials).await {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            let reason = if credentials.is_complete() {
                "credentials rejected"
            } else {
                "missing credentials"
            };
            HttpAppError(ApiError::Unauthorized(reason.to_string())).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Authorization check failed");
            HttpAppError(ApiError::Unauthorized(e.to_string())).into_response()
        }
    }
}
