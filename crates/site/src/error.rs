//! Unified error handling with Sentry integration.
//!
//! Route handlers that can fail return `Result<T, AppError>`; server-class
//! errors are captured to Sentry before the response goes out.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mediarch_backend::StoreError;
use thiserror::Error;

/// Application-level error type for the public site.
#[derive(Debug, Error)]
pub enum AppError {
    /// The hosted store rejected or failed a call.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Store(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose store details to visitors
        let message = match &self {
            Self::Store(_) => "Something went wrong. Please try again.",
            Self::NotFound(_) => "Page not found",
        };

        (self.status(), message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for a visitor action.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_failure_is_bad_gateway() {
        let err = AppError::from(StoreError::Api {
            status: 500,
            code: None,
            message: "relation does not exist".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_found_status_code() {
        assert_eq!(
            AppError::NotFound("/nope".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
