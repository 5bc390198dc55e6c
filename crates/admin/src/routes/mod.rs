//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /admin/login                      - Login page
//! POST /admin/login                      - Password sign-in
//! POST /admin/logout                     - Sign out
//! GET  /admin?tab=contacts|newsletter    - Dashboard
//! POST /admin/refresh                    - Re-fetch both lists
//! POST /admin/delete/confirm             - Perform the pending delete
//! POST /admin/delete/cancel              - Dismiss the delete confirmation
//!
//! # Contacts
//! GET  /admin/contacts/{id}              - Open detail (marks read)
//! POST /admin/contacts/close             - Close detail
//! POST /admin/contacts/{id}/status       - Set status
//! POST /admin/contacts/{id}/delete       - Ask for delete confirmation
//!
//! # Subscriptions
//! POST /admin/subscriptions/{id}/toggle  - Toggle active/unsubscribed
//! POST /admin/subscriptions/{id}/delete  - Ask for delete confirmation
//! GET  /admin/subscriptions/{id}/mail    - Redirect to mailto:
//! ```
//!
//! Every POST answers `303 See Other` back to the dashboard; outcomes are
//! queued as notices on the session's dashboard.

pub mod auth;
pub mod contacts;
pub mod dashboard;
pub mod subscriptions;

use std::sync::Arc;

use axum::{Router, response::Redirect};
use mediarch_backend::DataStore;
use mediarch_backend::dashboard::Tab;

use crate::dashboards::SharedDashboard;
use crate::models::AdminSession;
use crate::state::AppState;

/// Create the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(contacts::router())
        .merge(subscriptions::router())
}

/// What a moderation action works on: this login's dashboard and a store
/// acting as this admin.
pub(crate) struct Workspace {
    pub dashboard: SharedDashboard,
    pub store: Arc<dyn DataStore>,
}

impl Workspace {
    pub(crate) async fn open(state: &AppState, admin: &AdminSession) -> Self {
        Self {
            dashboard: state.dashboards().get(admin.dashboard_key).await,
            store: state.store_for(&admin.auth),
        }
    }
}

/// Redirect back to the dashboard on `tab`.
pub(crate) fn back_to(tab: Tab) -> Redirect {
    Redirect::to(&format!("/admin?tab={}", tab.as_str()))
}
