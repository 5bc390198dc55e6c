//! Authentication extractor and session helpers for admin.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use mediarch_backend::Notice;
use tower_sessions::Session;

use crate::models::{AdminSession, session_keys};

/// Where unauthenticated requests are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Extractor that requires a stored admin login.
///
/// Only checks that a login is present in the session. The dashboard page
/// additionally verifies it with the auth service on mount; every other
/// action relies on the store's row-level security to reject stale tokens.
pub struct RequireAdminAuth(pub AdminSession);

/// Rejection for [`RequireAdminAuth`].
pub enum AdminAuthRejection {
    /// No login stored; go to the login page.
    RedirectToLogin,
    /// Session layer missing from the stack.
    MissingSession,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::MissingSession)?;

        let admin: AdminSession = session
            .get(session_keys::ADMIN_SESSION)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection::RedirectToLogin)?;

        Ok(Self(admin))
    }
}

/// Read the stored login, if any.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn current_admin(
    session: &Session,
) -> Result<Option<AdminSession>, tower_sessions::session::Error> {
    session.get(session_keys::ADMIN_SESSION).await
}

/// Store a fresh login, rotating the session ID first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin_session(
    session: &Session,
    admin: &AdminSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::ADMIN_SESSION, admin).await
}

/// Replace the stored tokens of an existing login, e.g. after a refresh.
///
/// The session ID is kept.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn update_admin_session(
    session: &Session,
    admin: &AdminSession,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ADMIN_SESSION, admin).await
}

/// Remove the stored login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_admin_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AdminSession>(session_keys::ADMIN_SESSION)
        .await?;
    Ok(())
}

/// Queue a notice for the next login page render.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_login_flash(
    session: &Session,
    notice: Notice,
) -> Result<(), tower_sessions::session::Error> {
    let mut notices: Vec<Notice> = session
        .get(session_keys::LOGIN_FLASH)
        .await?
        .unwrap_or_default();
    notices.push(notice);
    session.insert(session_keys::LOGIN_FLASH, notices).await
}

/// Drain notices queued for the login page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_login_flash(
    session: &Session,
) -> Result<Vec<Notice>, tower_sessions::session::Error> {
    Ok(session
        .remove(session_keys::LOGIN_FLASH)
        .await?
        .unwrap_or_default())
}
