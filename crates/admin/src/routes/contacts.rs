//! Contact enquiry moderation.

use axum::{
    Form, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};
use mediarch_backend::dashboard::{DeleteTarget, Tab};
use mediarch_core::{ContactId, ContactStatus};
use serde::Deserialize;
use tracing::instrument;

use super::{Workspace, back_to};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: ContactStatus,
}

/// Build the contacts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/contacts/close", post(close))
        .route("/admin/contacts/{id}", get(view))
        .route("/admin/contacts/{id}/status", post(set_status))
        .route("/admin/contacts/{id}/delete", post(request_delete))
}

/// Open the detail dialog, marking the contact read the first time.
///
/// GET /admin/contacts/{id}
#[instrument(skip(state, admin), fields(contact_id = %id))]
async fn view(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<ContactId>,
) -> Redirect {
    let workspace = Workspace::open(&state, &admin).await;
    workspace
        .dashboard
        .lock()
        .await
        .view_contact(workspace.store.as_ref(), id)
        .await;
    back_to(Tab::Contacts)
}

/// Close the detail dialog (refused while a delete is in flight).
///
/// POST /admin/contacts/close
async fn close(State(state): State<AppState>, RequireAdminAuth(admin): RequireAdminAuth) -> Redirect {
    let workspace = Workspace::open(&state, &admin).await;
    workspace.dashboard.lock().await.close_detail();
    back_to(Tab::Contacts)
}

/// Mark a contact accepted or rejected.
///
/// POST /admin/contacts/{id}/status
#[instrument(skip(state, admin, form), fields(contact_id = %id, status = %form.status))]
async fn set_status(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<ContactId>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    let workspace = Workspace::open(&state, &admin).await;
    workspace
        .dashboard
        .lock()
        .await
        .set_contact_status(workspace.store.as_ref(), id, form.status)
        .await;
    back_to(Tab::Contacts)
}

/// Ask for confirmation before deleting a contact.
///
/// POST /admin/contacts/{id}/delete
async fn request_delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<ContactId>,
) -> Redirect {
    let workspace = Workspace::open(&state, &admin).await;
    workspace
        .dashboard
        .lock()
        .await
        .request_delete(DeleteTarget::Contact(id));
    back_to(Tab::Contacts)
}
