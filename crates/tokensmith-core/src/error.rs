use thiserror::Error;

/// Fatal errors: anything here aborts the run.
#[derive(Debug, Error)]
pub enum TokensmithError {
    #[error("config error: {0}")]
    Config(String),
    #[error("credential store error ({path}): {message}")]
    Store { path: String, message: String },
    #[error("output error ({path}): {message}")]
    Output { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, TokensmithError>;

/// Why a single organization did not refresh. Recorded on the record and in
/// the run log, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("request error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_error_rendering() {
        assert_eq!(RefreshError::MissingCredentials.to_string(), "missing credentials");
        assert_eq!(
            RefreshError::Http {
                status: 401,
                body: r#"{"message":"invalid token"}"#.to_string(),
            }
            .to_string(),
            r#"HTTP 401: {"message":"invalid token"}"#
        );
        assert_eq!(
            RefreshError::Transport("connection refused".to_string()).to_string(),
            "request error: connection refused"
        );
    }

    #[test]
    fn test_store_error_names_path() {
        let err = TokensmithError::Store {
            path: "tokens_master.json".to_string(),
            message: "not found".to_string(),
        };
        assert!(err.to_string().contains("tokens_master.json"));
    }
}
