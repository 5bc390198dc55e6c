//! Error types for store and auth calls.

use serde::Deserialize;
use thiserror::Error;

/// `PostgreSQL` SQLSTATE for a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Errors returned by a [`DataStore`](crate::store::DataStore).
///
/// The `Display` output is what gets shown to users in failure notices, so
/// API variants render the store's own message.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A uniqueness constraint rejected the write.
    #[error("{message}")]
    Conflict { message: String },

    /// Row-level security or an expired token rejected the call.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The addressed row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other error response from the store.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl StoreError {
    /// Whether this is a uniqueness violation (a benign outcome for inserts).
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Build an error from a non-success `PostgREST` response.
    ///
    /// The body is usually `{"code", "message", "details", "hint"}`; anything
    /// else is kept verbatim as the message.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<PostgrestErrorBody> = serde_json::from_str(body).ok();
        let (code, message) = match parsed {
            Some(err) => (err.code, err.message.unwrap_or_else(|| body.to_string())),
            None => (None, body.to_string()),
        };

        if code.as_deref() == Some(UNIQUE_VIOLATION) {
            return Self::Conflict { message };
        }

        match status {
            401 | 403 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            _ => Self::Api {
                status,
                code,
                message,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Errors returned by an [`AuthProvider`](crate::auth::AuthProvider).
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Email/password pair was rejected.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// The access token is missing, expired or revoked.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Any other error response from the auth service.
    #[error("Auth API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AuthError {
    /// Build an error from a non-success `GoTrue` response.
    ///
    /// `GoTrue` has used both `{"error", "error_description"}` and
    /// `{"error_code", "msg"}` shapes; either is accepted.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<GotrueErrorBody> = serde_json::from_str(body).ok();
        let (kind, message) = parsed.map_or_else(
            || (None, body.to_string()),
            |err| {
                let kind = err.error_code.or(err.error);
                let message = err
                    .msg
                    .or(err.error_description)
                    .or(err.message)
                    .unwrap_or_else(|| body.to_string());
                (kind, message)
            },
        );

        match (status, kind.as_deref()) {
            (_, Some("invalid_grant" | "invalid_credentials")) => Self::InvalidCredentials,
            (401 | 403, _) => Self::SessionExpired(message),
            _ => Self::Api { status, message },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GotrueErrorBody {
    error: Option<String>,
    error_code: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_conflict() {
        let body = r#"{"code":"23505","details":"Key (email)=(a@b.com) already exists.","hint":null,"message":"duplicate key value violates unique constraint \"newsletter_subscriptions_email_key\""}"#;
        let err = StoreError::from_response(409, body);
        assert!(err.is_conflict());
        assert!(err.to_string().contains("duplicate key"));
    }

    #[test]
    fn test_rls_rejection_is_unauthorized() {
        let body = r#"{"code":"42501","message":"new row violates row-level security policy"}"#;
        let err = StoreError::from_response(403, body);
        assert!(matches!(err, StoreError::Unauthorized(_)));
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_unparseable_body_is_kept() {
        let err = StoreError::from_response(500, "upstream exploded");
        match err {
            StoreError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 500);
                assert!(code.is_none());
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_gotrue_invalid_grant() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert!(matches!(
            AuthError::from_response(400, body),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn test_gotrue_new_error_shape() {
        let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        assert!(matches!(
            AuthError::from_response(400, body),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn test_gotrue_expired_token() {
        let body = r#"{"code":401,"error_code":"bad_jwt","msg":"invalid JWT: token is expired"}"#;
        match AuthError::from_response(401, body) {
            AuthError::SessionExpired(message) => assert!(message.contains("expired")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
