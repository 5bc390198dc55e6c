//! Contact enquiry handler.

use axum::{Json, extract::State, http::StatusCode};
use mediarch_backend::contact_form::{ContactFormError, ContactSubmission};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Store a contact enquiry.
///
/// POST /contact
///
/// Validation problems answer 400 with a message the visitor can act on.
/// A store failure is a 502 with a generic message.
#[instrument(skip(state, form), fields(email = %form.email.trim()))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactSubmission>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    match form.submit(state.store()).await {
        Ok(_) => {
            add_breadcrumb("contact", "Submitted contact enquiry");
            Ok((
                StatusCode::OK,
                Json(ContactResponse {
                    success: true,
                    message: None,
                }),
            ))
        }
        Err(ContactFormError::Store(e)) => Err(AppError::Store(e)),
        Err(e) => Ok((
            StatusCode::BAD_REQUEST,
            Json(ContactResponse {
                success: false,
                message: Some(e.to_string()),
            }),
        )),
    }
}
