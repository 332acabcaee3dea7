use std::time::Duration;

use async_trait::async_trait;

use super::{AuthError, Authorizer, Credentials, USER_EMAIL_HEADER, USER_TOKEN_HEADER};

/// Asks the identity backend whether a user's token is valid.
///
/// Sends `GET {base_url}/auth/check` with the caller's email and token headers;
/// any 2xx answer authorizes the request.
#[derive(Debug, Clone)]
pub struct BackendAuthorizer {
    client: reqwest::Client,
    check_url: String,
}

impl BackendAuthorizer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build auth client: {}", e))?;

        Ok(Self {
            client,
            check_url: format!("{}/auth/check", base_url.trim_end_matches('/')),
        })
    }

    pub fn check_url(&self) -> &str {
        &self.check_url
    }
}

#[async_trait]
impl Authorizer for BackendAuthorizer {
    async fn authorize(&self, credentials: &Credentials) -> Result<bool, AuthError> {
        let (Some(email), Some(token)) = (&credentials.email, &credentials.token) else {
            return Ok(false);
        };

        let response = self
            .client
            .get(&self.check_url)
            .header(USER_EMAIL_HEADER, email)
            .header(USER_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Identity backend answered");
        Ok(status.is_success())
    }
}
