//! Newsletter subscription moderation.

use axum::{
    Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};
use mediarch_backend::dashboard::{DeleteTarget, Tab};
use mediarch_core::SubscriptionId;
use tracing::instrument;

use super::{Workspace, back_to};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the subscriptions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/subscriptions/{id}/toggle", post(toggle))
        .route("/admin/subscriptions/{id}/delete", post(request_delete))
        .route("/admin/subscriptions/{id}/mail", get(mail))
}

/// Flip between `active` and `unsubscribed`.
///
/// POST /admin/subscriptions/{id}/toggle
#[instrument(skip(state, admin), fields(subscription_id = %id))]
async fn toggle(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<SubscriptionId>,
) -> Redirect {
    let workspace = Workspace::open(&state, &admin).await;
    workspace
        .dashboard
        .lock()
        .await
        .toggle_subscription(workspace.store.as_ref(), id)
        .await;
    back_to(Tab::Newsletter)
}

/// Ask for confirmation before deleting a subscription.
///
/// POST /admin/subscriptions/{id}/delete
async fn request_delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<SubscriptionId>,
) -> Redirect {
    let workspace = Workspace::open(&state, &admin).await;
    workspace
        .dashboard
        .lock()
        .await
        .request_delete(DeleteTarget::Subscription(id));
    back_to(Tab::Newsletter)
}

/// Hand off to the mail client. No store call.
///
/// GET /admin/subscriptions/{id}/mail
async fn mail(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<SubscriptionId>,
) -> Result<Redirect> {
    let workspace = Workspace::open(&state, &admin).await;
    let url = workspace.dashboard.lock().await.mailto_url(id);
    url.map(|url| Redirect::to(&url))
        .ok_or_else(|| AppError::NotFound(format!("subscription {id}")))
}
