//! Per-login dashboard registry.
//!
//! Each admin login owns one [`Dashboard`] behind an async mutex, so actions
//! from the same browser session run one at a time. Entries idle out with
//! the session lifetime.

use std::sync::Arc;
use std::time::Duration;

use mediarch_backend::dashboard::Dashboard;
use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::middleware::session::SESSION_EXPIRY_SECONDS;

/// Shared handle to one session's dashboard.
pub type SharedDashboard = Arc<Mutex<Dashboard>>;

#[derive(Clone)]
pub struct DashboardRegistry {
    cache: Cache<Uuid, SharedDashboard>,
}

impl Default for DashboardRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardRegistry {
    #[must_use]
    pub fn new() -> Self {
        let idle = Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs());
        Self {
            cache: Cache::builder()
                .max_capacity(1000)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// The dashboard for `key`, created empty on first use.
    pub async fn get(&self, key: Uuid) -> SharedDashboard {
        self.cache
            .get_with(key, async { Arc::new(Mutex::new(Dashboard::new())) })
            .await
    }

    /// Drop a dashboard at logout.
    pub async fn remove(&self, key: Uuid) {
        self.cache.invalidate(&key).await;
    }
}
