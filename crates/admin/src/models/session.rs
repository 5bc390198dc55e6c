//! Types stored in the HTTP session.

use mediarch_backend::AuthSession;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session-stored admin login.
///
/// Holds the backend tokens plus the key of this login's dashboard in the
/// [`DashboardRegistry`](crate::dashboards::DashboardRegistry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub auth: AuthSession,
    pub dashboard_key: Uuid,
}

impl AdminSession {
    /// A fresh login with its own dashboard key.
    #[must_use]
    pub fn new(auth: AuthSession) -> Self {
        Self {
            auth,
            dashboard_key: Uuid::new_v4(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        self.auth.user.email.as_deref().unwrap_or("admin")
    }
}

/// Session keys for admin authentication data.
pub mod session_keys {
    /// The logged-in admin.
    pub const ADMIN_SESSION: &str = "admin_session";

    /// Notices shown once on the login page.
    pub const LOGIN_FLASH: &str = "login_flash";
}
