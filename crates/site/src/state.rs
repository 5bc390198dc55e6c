//! Application state shared across handlers.

use std::sync::Arc;

use mediarch_backend::{DataStore, StoreProvider};
use url::Url;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The site only ever acts as the anonymous
/// public role, so it holds that one store handle.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    base_url: Url,
    store: Arc<dyn DataStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Public URL of the site
    /// * `stores` - Backend handing out the anonymous store
    #[must_use]
    pub fn new(base_url: Url, stores: &dyn StoreProvider) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                base_url,
                store: stores.anonymous(),
            }),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Store acting as the anonymous public role.
    #[must_use]
    pub fn store(&self) -> &dyn DataStore {
        self.inner.store.as_ref()
    }
}
