pub mod webex;

use async_trait::async_trait;
use tokensmith_core::error::RefreshError;
use tokensmith_core::types::HttpReply;

/// Credentials for one `refresh_token` grant.
#[derive(Clone, Copy)]
pub struct RefreshRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub refresh_token: &'a str,
}

impl<'a> RefreshRequest<'a> {
    /// Form body fields for the token endpoint.
    pub fn form(&self) -> [(&'static str, &'a str); 4] {
        [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id),
            ("client_secret", self.client_secret),
            ("refresh_token", self.refresh_token),
        ]
    }
}

/// Anything that can exchange a refresh token at an OAuth token endpoint.
///
/// Implementations return the raw reply for every HTTP status and only use
/// `Err` for failures below HTTP (connect, DNS, timeout, body read).
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    async fn refresh(&self, request: &RefreshRequest<'_>) -> Result<HttpReply, RefreshError>;
}
