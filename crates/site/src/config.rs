//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_BASE_URL` - Public URL for the site
//! - `SUPABASE_URL` / `SUPABASE_ANON_KEY` - See [`SupabaseConfig`]
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SENTRY_*` - See [`SentryConfig`]

use std::net::{IpAddr, SocketAddr};

use mediarch_backend::config::{
    ConfigError, SentryConfig, SupabaseConfig, get_url, parse_env_or_default,
};
use url::Url;

/// Public site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used for canonical links
    pub base_url: Url,
    pub supabase: SupabaseConfig,
    pub sentry: SentryConfig,
}

impl SiteConfig {
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
            host: parse_env_or_default("SITE_HOST", "127.0.0.1")?,
            port: parse_env_or_default("SITE_PORT", "3000")?,
            base_url: get_url("SITE_BASE_URL")?,
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::Ipv4Addr;

    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_socket_addr_and_redacted_debug() {
        let config = SiteConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: Url::parse("https://mediarch.gg").unwrap(),
            supabase: SupabaseConfig {
                url: Url::parse("https://abcd.supabase.co").unwrap(),
                anon_key: SecretString::from("k9Qz-anon-7fT2"),
            },
            sentry: SentryConfig::default(),
        };

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        let debug = format!("{config:?}");
        assert!(!debug.contains("k9Qz-anon-7fT2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
