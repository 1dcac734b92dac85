//! Per-organization refresh: credential check, one endpoint call, and
//! merging the outcome back into the record.

use chrono::{DateTime, Local};
use tokensmith_core::error::RefreshError;
use tokensmith_core::types::{CredentialRecord, HttpReply, LogEntry, RefreshStatus, TokenResponse};
use tokensmith_integrations::{RefreshRequest, TokenEndpoint};
use tracing::{error, info, warn};

use crate::clock::{iso8601, Clock};

/// Build the grant request, or `MissingCredentials` if any of the three
/// required fields is absent or empty.
pub fn validate(record: &CredentialRecord) -> Result<RefreshRequest<'_>, RefreshError> {
    match (record.client_id(), record.client_secret(), record.refresh_token()) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => Ok(RefreshRequest {
            client_id,
            client_secret,
            refresh_token,
        }),
        _ => Err(RefreshError::MissingCredentials),
    }
}

/// Merge an endpoint outcome into `record` and produce its log entry.
///
/// `MissingCredentials` marks the record skipped; every other error marks it
/// failed.
pub fn apply_outcome(
    org: &str,
    record: &mut CredentialRecord,
    outcome: Result<HttpReply, RefreshError>,
    now: &DateTime<Local>,
) -> LogEntry {
    let timestamp = iso8601(now);

    let parsed = outcome.and_then(parse_reply);
    match parsed {
        Ok((payload, tokens)) => {
            record.mark_success(tokens, timestamp.clone());

            LogEntry {
                org: org.to_string(),
                timestamp,
                status: RefreshStatus::Success,
                response: Some(payload),
                error: None,
            }
        }
        Err(err) => {
            let status = match err {
                RefreshError::MissingCredentials => RefreshStatus::Skipped,
                _ => RefreshStatus::Failed,
            };
            let message = err.to_string();
            record.mark_unrefreshed(status, message.clone());

            LogEntry {
                org: org.to_string(),
                timestamp,
                status,
                response: None,
                error: Some(message),
            }
        }
    }
}

fn parse_reply(reply: HttpReply) -> Result<(serde_json::Value, TokenResponse), RefreshError> {
    if !(200..300).contains(&reply.status) {
        return Err(RefreshError::Http {
            status: reply.status,
            body: reply.body,
        });
    }

    let payload: serde_json::Value = serde_json::from_str(&reply.body)
        .map_err(|e| RefreshError::InvalidResponse(format!("body is not JSON: {e}")))?;
    let tokens: TokenResponse = serde_json::from_value(payload.clone())
        .map_err(|e| RefreshError::InvalidResponse(e.to_string()))?;
    if tokens.access_token.is_empty() {
        return Err(RefreshError::InvalidResponse("empty access_token".to_string()));
    }

    Ok((payload, tokens))
}

/// Refresh one organization in place and report it on the console.
pub async fn refresh_one(
    org: &str,
    record: &mut CredentialRecord,
    endpoint: &dyn TokenEndpoint,
    clock: &dyn Clock,
) -> LogEntry {
    let outcome = match validate(record) {
        Ok(request) => endpoint.refresh(&request).await,
        Err(e) => Err(e),
    };

    let entry = apply_outcome(org, record, outcome, &clock.now());
    match entry.status {
        RefreshStatus::Success => info!(org, "refreshed successfully"),
        RefreshStatus::Skipped => warn!(org, "skipping, missing credentials"),
        RefreshStatus::Failed => error!(
            org,
            error = entry.error.as_deref().unwrap_or_default(),
            "refresh failed"
        ),
    }
    entry
}
