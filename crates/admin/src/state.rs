//! Application state shared across handlers.

use std::sync::Arc;

use mediarch_backend::{AuthContext, AuthProvider, AuthSession, DataStore, StoreProvider};
use url::Url;

use crate::config::is_secure;
use crate::dashboards::DashboardRegistry;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    base_url: Url,
    auth: Arc<dyn AuthProvider>,
    stores: Arc<dyn StoreProvider>,
    dashboards: DashboardRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Public URL of the dashboard
    /// * `backend` - Auth service and store provider (usually one client)
    pub fn new<B>(base_url: Url, backend: B) -> Self
    where
        B: AuthProvider + StoreProvider + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            inner: Arc::new(AppStateInner {
                base_url,
                auth: backend.clone(),
                stores: backend,
                dashboards: DashboardRegistry::new(),
            }),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Whether session cookies carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        is_secure(&self.inner.base_url)
    }

    /// A fresh auth context around `stored` for this request.
    #[must_use]
    pub fn auth_context(&self, stored: Option<AuthSession>) -> AuthContext {
        AuthContext::new(self.inner.auth.clone(), stored)
    }

    /// Store acting as the admin behind `session`.
    #[must_use]
    pub fn store_for(&self, session: &AuthSession) -> Arc<dyn DataStore> {
        self.inner.stores.for_session(session)
    }

    #[must_use]
    pub fn dashboards(&self) -> &DashboardRegistry {
        &self.inner.dashboards
    }
}
