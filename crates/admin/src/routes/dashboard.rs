//! Dashboard page, refresh and delete confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use mediarch_backend::Notice;
use mediarch_backend::dashboard::{Dashboard, Tab};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use super::{Workspace, back_to};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::{
    LOGIN_PATH, RequireAdminAuth, clear_admin_session, push_login_flash, update_admin_session,
};
use crate::state::AppState;
use crate::views::DashboardView;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub view: DashboardView,
}

/// `?tab=` on the page, or a hidden `tab` field on forms.
#[derive(Debug, Default, Deserialize)]
pub struct TabParam {
    pub tab: Option<String>,
}

impl TabParam {
    fn tab(&self) -> Tab {
        Tab::from_query(self.tab.as_deref())
    }
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(show))
        .route("/admin/refresh", post(refresh))
        .route("/admin/delete/confirm", post(confirm_delete))
        .route("/admin/delete/cancel", post(cancel_delete))
}

/// Mount the dashboard.
///
/// The stored login is checked with the auth service first. An expired one is
/// refreshed and the new tokens stored back in the session; a rejected one is
/// dropped and the admin sent to the login page. The lists are fetched on the
/// first mount only.
///
/// GET /admin
#[instrument(skip_all, fields(admin = %admin.email()))]
async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(mut admin): RequireAdminAuth,
    Query(params): Query<TabParam>,
) -> Result<Response> {
    let mut auth = state.auth_context(Some(admin.auth.clone()));
    if !auth.initialize().await {
        info!("Stored login no longer valid");
        clear_admin_session(&session).await?;
        state.dashboards().remove(admin.dashboard_key).await;
        push_login_flash(
            &session,
            Notice::destructive("Session expired", "Please sign in again."),
        )
        .await?;
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }

    if let Some(current) = auth.session()
        && current.access_token != admin.auth.access_token
    {
        info!("Stored login refreshed");
        admin.auth = current.clone();
        update_admin_session(&session, &admin).await?;
    }

    let workspace = Workspace::open(&state, &admin).await;
    let mut dashboard = workspace.dashboard.lock().await;
    dashboard.ensure_loaded(workspace.store.as_ref()).await;

    let view = DashboardView::render(&mut dashboard, params.tab(), admin.email());
    Ok(DashboardTemplate { view }.into_response())
}

/// Re-fetch both lists.
///
/// POST /admin/refresh
#[instrument(skip_all)]
async fn refresh(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(params): Form<TabParam>,
) -> Redirect {
    let workspace = Workspace::open(&state, &admin).await;
    workspace
        .dashboard
        .lock()
        .await
        .load(workspace.store.as_ref())
        .await;
    back_to(params.tab())
}

/// Perform the pending delete.
///
/// The dashboard lock is released while the remote call runs, so a page
/// render in the meantime shows the confirm control disabled. A repeated
/// confirm finds the delete already in flight and does nothing.
///
/// POST /admin/delete/confirm
#[instrument(skip_all)]
async fn confirm_delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(params): Form<TabParam>,
) -> Redirect {
    let workspace = Workspace::open(&state, &admin).await;

    let Some(target) = workspace.dashboard.lock().await.begin_delete() else {
        return back_to(params.tab());
    };

    let result = Dashboard::perform_delete(workspace.store.as_ref(), target).await;
    if result.is_ok() {
        add_breadcrumb("moderation", "Deleted record", None);
    }
    workspace.dashboard.lock().await.finish_delete(target, result);

    back_to(target.tab())
}

/// Dismiss the delete confirmation.
///
/// POST /admin/delete/cancel
#[instrument(skip_all)]
async fn cancel_delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(params): Form<TabParam>,
) -> Redirect {
    let workspace = Workspace::open(&state, &admin).await;
    let mut dashboard = workspace.dashboard.lock().await;
    let tab = dashboard
        .pending_delete()
        .map_or_else(|| params.tab(), |target| target.tab());
    dashboard.cancel_delete();
    back_to(tab)
}
