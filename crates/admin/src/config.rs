//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the dashboard (`https://` enables secure cookies)
//! - `SUPABASE_URL` / `SUPABASE_ANON_KEY` - See [`SupabaseConfig`]
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SENTRY_*` - See [`SentryConfig`]

use std::net::{IpAddr, SocketAddr};

use mediarch_backend::config::{
    ConfigError, SentryConfig, SupabaseConfig, get_url, parse_env_or_default,
};
use url::Url;

/// Admin dashboard configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the dashboard
    pub base_url: Url,
    pub supabase: SupabaseConfig,
    pub sentry: SentryConfig,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the anon key fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env_or_default("ADMIN_HOST", "127.0.0.1")?,
            port: parse_env_or_default("ADMIN_PORT", "3001")?,
            base_url: get_url("ADMIN_BASE_URL")?,
            supabase: SupabaseConfig::from_env()?,
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Whether session cookies for `base_url` must be `Secure`.
#[must_use]
pub fn is_secure(base_url: &Url) -> bool {
    base_url.scheme() == "https"
}
