//! Session middleware configuration for admin.
//!
//! In-memory sessions with strict cookie settings (SameSite=Strict,
//! HttpOnly, 24 hour inactivity expiry). Sessions do not survive a restart.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "mediarch_admin_session";

/// Session expiry time in seconds (24 hours of inactivity).
pub const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer.
///
/// `secure` should be true whenever the dashboard is served over HTTPS.
#[must_use]
pub fn create_session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
