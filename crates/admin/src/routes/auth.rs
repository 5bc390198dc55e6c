//! Login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use mediarch_backend::{AuthError, Notice};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{
    LOGIN_PATH, clear_admin_session, current_admin, push_login_flash, set_admin_session,
    take_login_flash,
};
use crate::models::AdminSession;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/admin/logout", post(logout))
}

/// Render the login page, or skip it when already signed in.
///
/// GET /admin/login
async fn login_page(session: Session) -> Result<Response> {
    if current_admin(&session).await?.is_some() {
        return Ok(Redirect::to("/admin").into_response());
    }

    Ok(LoginTemplate {
        email: String::new(),
        error: None,
        notices: take_login_flash(&session).await?,
    }
    .into_response())
}

fn login_failed(status: StatusCode, email: String, error: &str) -> Response {
    (
        status,
        LoginTemplate {
            email,
            error: Some(error.to_string()),
            notices: Vec::new(),
        },
    )
        .into_response()
}

/// Sign in with email and password.
///
/// POST /admin/login
#[instrument(skip(state, session, form), fields(email = %form.email.trim()))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Ok(login_failed(
            StatusCode::BAD_REQUEST,
            form.email,
            "Email and password are required.",
        ));
    }

    let mut auth = state.auth_context(None);
    let signed_in = auth.sign_in(&form.email, &form.password).await.cloned();

    match signed_in {
        Ok(auth_session) => {
            set_sentry_user(&auth_session.user.id, auth_session.user.email.as_deref());
            set_admin_session(&session, &AdminSession::new(auth_session)).await?;
            add_breadcrumb("auth", "Admin signed in", None);
            Ok(Redirect::to("/admin").into_response())
        }
        Err(AuthError::InvalidCredentials) => Ok(login_failed(
            StatusCode::UNAUTHORIZED,
            form.email,
            "Invalid login credentials",
        )),
        Err(e) => {
            warn!(error = %e, "Sign-in failed");
            Ok(login_failed(
                StatusCode::BAD_GATEWAY,
                form.email,
                "Unable to sign in right now. Please try again.",
            ))
        }
    }
}

/// Sign out remotely and locally.
///
/// Local state is cleared even if the remote sign-out fails; the failure is
/// shown on the login page.
///
/// POST /admin/logout
#[instrument(skip(state, session))]
async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let Some(admin) = current_admin(&session).await? else {
        return Ok(Redirect::to(LOGIN_PATH));
    };

    let mut auth = state.auth_context(Some(admin.auth));
    let result = auth.sign_out().await;

    clear_admin_session(&session).await?;
    state.dashboards().remove(admin.dashboard_key).await;
    clear_sentry_user();

    let notice = match result {
        Ok(()) => Notice::success("Logged out successfully"),
        Err(e) => Notice::destructive("Error logging out", e.to_string()),
    };
    push_login_flash(&session, notice).await?;

    Ok(Redirect::to(LOGIN_PATH))
}
