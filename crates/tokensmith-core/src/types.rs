use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Organization key → credentials, in store file order.
pub type CredentialStore = IndexMap<String, CredentialRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStatus {
    Success,
    Failed,
    Skipped,
}

const SECRET_FIELDS: [&str; 3] = ["client_secret", "refresh_token", "access_token"];

/// One organization's OAuth client and tokens.
///
/// Backed by the record's JSON object as read from the store, so field
/// order and fields this program does not know about survive a run. Updates
/// overwrite keys in place; new keys are appended.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRecord(Map<String, Value>);

impl CredentialRecord {
    pub fn client_id(&self) -> Option<&str> {
        self.non_empty("client_id")
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.non_empty("client_secret")
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.non_empty("refresh_token")
    }

    pub fn access_token(&self) -> Option<&str> {
        self.non_empty("access_token")
    }

    pub fn expires_in(&self) -> Option<i64> {
        self.0.get("expires_in").and_then(Value::as_i64)
    }

    /// ISO-8601 time of the last successful refresh.
    pub fn date(&self) -> Option<&str> {
        self.non_empty("date")
    }

    /// Status written by this program. Anything else in the store (for
    /// example `"error"`) reads as `None` and is replaced on the next run.
    pub fn status(&self) -> Option<RefreshStatus> {
        self.0
            .get("status")
            .and_then(|v| RefreshStatus::deserialize(v).ok())
    }

    pub fn error(&self) -> Option<&str> {
        self.0.get("error").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Record a successful refresh. A missing `refresh_token` in the
    /// response keeps the current one.
    pub fn mark_success(&mut self, tokens: TokenResponse, date: String) {
        self.set("access_token", Value::String(tokens.access_token));
        if let Some(refresh_token) = tokens.refresh_token {
            self.set("refresh_token", Value::String(refresh_token));
        }
        if let Some(expires_in) = tokens.expires_in {
            self.set("expires_in", expires_in.into());
        }
        if let Some(expires_in) = tokens.refresh_token_expires_in {
            self.set("refresh_token_expires_in", expires_in.into());
        }
        self.set("date", Value::String(date));
        self.set_status(RefreshStatus::Success);
        self.set("error", Value::Null);
    }

    /// Record a skip or failure, leaving tokens untouched.
    pub fn mark_unrefreshed(&mut self, status: RefreshStatus, error: String) {
        self.set_status(status);
        self.set("error", Value::String(error));
    }

    fn set_status(&mut self, status: RefreshStatus) {
        let value = serde_json::to_value(status).unwrap_or(Value::Null);
        self.set("status", value);
    }

    fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

impl From<Map<String, Value>> for CredentialRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.0 {
            if SECRET_FIELDS.contains(&key.as_str()) {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

/// Token endpoint success body. Only `access_token` is mandatory.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token_expires_in: Option<i64>,
}

/// Raw HTTP reply from the token endpoint, any status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Audit line for one organization in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub org: String,
    pub timestamp: String,
    pub status: RefreshStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> CredentialRecord {
        serde_json::from_value(value).unwrap()
    }

    fn tokens(access: &str, refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_in: None,
            refresh_token_expires_in: None,
        }
    }

    #[test]
    fn test_unknown_fields_survive() {
        let record = record(json!({"client_id": "cid", "org_name": "Acme", "seats": 12}));
        assert_eq!(record.client_id(), Some("cid"));

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["org_name"], "Acme");
        assert_eq!(out["seats"], 12);
    }

    #[test]
    fn test_updates_keep_field_order() {
        let mut record = record(json!({
            "org_name": "Acme",
            "access_token": "old-at",
            "client_id": "cid",
            "client_secret": "s",
            "refresh_token": "old-rt",
            "notes": "primary tenant"
        }));

        record.mark_success(tokens("new-at", Some("new-rt")), "2025-03-04T09:30:00+00:00".to_string());

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(
            keys,
            [
                "org_name",
                "access_token",
                "client_id",
                "client_secret",
                "refresh_token",
                "notes",
                "date",
                "status",
                "error"
            ]
        );

        let out = serde_json::to_string(&record).unwrap();
        assert!(out.starts_with(r#"{"org_name":"Acme","access_token":"new-at""#));
    }

    #[test]
    fn test_foreign_status_reads_as_none() {
        let mut record = record(json!({"status": "error", "error": "boom"}));
        assert_eq!(record.status(), None);
        assert_eq!(record.error(), Some("boom"));

        record.mark_unrefreshed(RefreshStatus::Failed, "HTTP 500: oops".to_string());
        assert_eq!(record.status(), Some(RefreshStatus::Failed));
        assert_eq!(record.get("status"), Some(&json!("failed")));
    }

    #[test]
    fn test_empty_or_non_string_credentials_count_as_missing() {
        let record = record(json!({"client_id": "", "client_secret": "s", "refresh_token": 42}));
        assert_eq!(record.client_id(), None);
        assert_eq!(record.client_secret(), Some("s"));
        assert_eq!(record.refresh_token(), None);
    }

    #[test]
    fn test_success_clears_error_and_keeps_missing_refresh_token() {
        let mut record = record(json!({"refresh_token": "old-rt", "error": "HTTP 401: stale"}));
        record.mark_success(tokens("new-at", None), "2025-03-04T09:30:00+00:00".to_string());

        assert_eq!(record.refresh_token(), Some("old-rt"));
        assert_eq!(record.access_token(), Some("new-at"));
        assert_eq!(record.get("error"), Some(&Value::Null));
        assert_eq!(record.status(), Some(RefreshStatus::Success));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RefreshStatus::Skipped).unwrap(), "\"skipped\"");
        let status: RefreshStatus = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(status, RefreshStatus::Success);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let record = record(json!({
            "client_id": "cid",
            "client_secret": "hunter2",
            "refresh_token": "rt-secret"
        }));
        let debug = format!("{record:?}");
        assert!(debug.contains("cid"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("rt-secret"));
    }
}
