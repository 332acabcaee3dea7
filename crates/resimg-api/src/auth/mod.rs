//! Request authorization
//!
//! Every `/images` route asks an [`Authorizer`] whether the caller's
//! credentials are acceptable. The production implementation delegates the
//! decision to the identity backend; there is no local user database.

pub mod backend;
pub mod middleware;

use async_trait::async_trait;
use axum::http::HeaderMap;

pub use backend::BackendAuthorizer;

pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_TOKEN_HEADER: &str = "x-user-token";

/// Identity asserted by the caller's request headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: Option<String>,
    pub token: Option<String>,
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        Self {
            email: read(USER_EMAIL_HEADER),
            token: read(USER_TOKEN_HEADER),
        }
    }

    /// Both headers present and non-empty.
    pub fn is_complete(&self) -> bool {
        self.email.is_some() && self.token.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Identity backend unreachable: {0}")]
    Backend(String),
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    /// `Ok(true)` when the request may proceed.
    async fn authorize(&self, credentials: &Credentials) -> Result<bool, AuthError>;
}

/// Accepts every request. Only installed when authorization is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl Authorizer for AllowAll {
    async fn authorize(&self, _credentials: &Credentials) -> Result<bool, AuthError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_credentials_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("X-USER-EMAIL", HeaderValue::from_static("ada@example.com"));
        headers.insert("X-USER-TOKEN", HeaderValue::from_static(" secret "));

        let credentials = Credentials::from_headers(&headers);
        assert_eq!(credentials.email.as_deref(), Some("ada@example.com"));
        assert_eq!(credentials.token.as_deref(), Some("secret"));
        assert!(credentials.is_complete());
    }

    #[test]
    fn test_blank_headers_are_missing() {
        let mut headers = HeaderMap::new();
        headers.insert("X-USER-EMAIL", HeaderValue::from_static("ada@example.com"));
        headers.insert("X-USER-TOKEN", HeaderValue::from_static("   "));

        let credentials = Credentials::from_headers(&headers);
        assert_eq!(credentials.token, None);
        assert!(!credentials.is_complete());
    }

    #[tokio::test]
    async fn test_allow_all() {
        assert!(AllowAll.authorize(&Credentials::default()).await.unwrap());
    }
}
