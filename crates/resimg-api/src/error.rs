//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Store failures
//! convert through `From<StoreError>`, so `?` renders them with the status,
//! body and log level their `ErrorMetadata` prescribes.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use resimg_core::{ErrorMetadata, LogLevel, StoreError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Failures the HTTP layer adds on top of the store taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::Store(err) => err.kind(),
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::BadRequest(_) => "BadRequest",
        }
    }
}

impl ErrorMetadata for ApiError {
    fn http_status_code(&self) -> u16 {
        match self {
            ApiError::Store(err) => err.http_status_code(),
            ApiError::Unauthorized(_) => 401,
            ApiError::BadRequest(_) => 400,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Store(err) => err.error_code(),
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            ApiError::Store(err) => err.is_recoverable(),
            _ => false,
        }
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            ApiError::Store(err) => err.suggested_action(),
            ApiError::Unauthorized(_) => Some("Send valid X-USER-EMAIL and X-USER-TOKEN headers"),
            ApiError::BadRequest(_) => Some("Send a multipart/form-data body"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::Store(err) => err.client_message(),
            ApiError::Unauthorized(_) => "Unauthorized".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ApiError::Store(err) => err.log_level(),
            ApiError::Unauthorized(_) => LogLevel::Warn,
            ApiError::BadRequest(_) => LogLevel::Debug,
        }
    }
}

/// Wrapper implementing `IntoResponse` for API errors.
#[derive(Debug)]
pub struct HttpAppError(pub ApiError);

impl From<ApiError> for HttpAppError {
    fn from(err: ApiError) -> Self {
        HttpAppError(err)
    }
}

impl From<StoreError> for HttpAppError {
    fn from(err: StoreError) -> Self {
        HttpAppError(ApiError::Store(err))
    }
}

/// A body over the size limit is an oversized image; anything else is a
/// malformed request.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            HttpAppError(ApiError::Store(StoreError::InvalidImage(
                "File exceeds the maximum upload size".to_string(),
            )))
        } else {
            HttpAppError(ApiError::BadRequest(format!(
                "Invalid multipart body: {}",
                err.body_text()
            )))
        }
    }
}

fn log_error(error: &ApiError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = &self.0;

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(error);

        // Internal messages can name filesystem paths; keep them out of production bodies.
        let (details, error_type) = if is_production_env() {
            (None, None)
        } else {
            (Some(error.to_string()), Some(error.error_type().to_string()))
        };

        let body = Json(ErrorResponse {
            error: error.client_message(),
            details,
            error_type,
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        });

        (status, body).into_response()
    }
}
