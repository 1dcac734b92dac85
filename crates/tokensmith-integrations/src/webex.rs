use async_trait::async_trait;
use tokensmith_core::error::RefreshError;
use tokensmith_core::types::HttpReply;
use tracing::debug;

use crate::{RefreshRequest, TokenEndpoint};

/// Webex `/v1/access_token` client. One POST per call, no retries.
pub struct WebexTokenClient {
    token_url: String,
    http: reqwest::Client,
}

impl WebexTokenClient {
    pub fn new(token_url: impl Into<String>) -> Self {
        Self {
            token_url: token_url.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TokenEndpoint for WebexTokenClient {
    async fn refresh(&self, request: &RefreshRequest<'_>) -> Result<HttpReply, RefreshError> {
        debug!(url = %self.token_url, client_id = request.client_id, "posting refresh_token grant");

        // .form() sets Content-Type: application/x-www-form-urlencoded
        let resp = self
            .http
            .post(&self.token_url)
            .form(&request.form())
            .send()
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| RefreshError::Transport(format!("failed to read response: {e}")))?;

        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 on loopback has nothing listening.
        let client = WebexTokenClient::new("http://127.0.0.1:9/v1/access_token");
        let request = RefreshRequest {
            client_id: "cid",
            client_secret: "secret",
            refresh_token: "rt",
        };
        let err = client.refresh(&request).await.unwrap_err();
        assert!(matches!(err, RefreshError::Transport(_)));
    }
}
