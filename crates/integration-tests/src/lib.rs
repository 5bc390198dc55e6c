//! Integration tests for Mediarch.
//!
//! Both surfaces are served in-process on an ephemeral port, backed by a
//! shared [`MemoryBackend`], and driven over real HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mediarch-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `site` - Newsletter signup, contact form, rate limiting
//! - `admin` - Login, moderation actions, logout

use std::net::SocketAddr;

use axum::Router;
use mediarch_backend::MemoryBackend;
use reqwest::{Client, redirect::Policy};
use tokio::net::TcpListener;
use url::Url;

/// Admin account every admin test signs in with.
pub const ADMIN_EMAIL: &str = "admin@mediarch.gg";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// A surface listening on localhost, plus a cookie-keeping client that
/// does not follow redirects.
pub struct TestServer {
    pub base_url: Url,
    pub client: Client,
}

impl TestServer {
    async fn spawn(app: impl FnOnce(Url) -> Router) -> Self {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let base_url =
            Url::parse(&format!("http://{addr}")).expect("Failed to build test base URL");

        let router = app(base_url.clone());
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server stopped");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.base_url
            .join(path)
            .expect("Failed to join test path")
            .to_string()
    }
}

/// Serve the public site over `backend`.
pub async fn spawn_site(backend: &MemoryBackend) -> TestServer {
    let backend = backend.clone();
    TestServer::spawn(move |base_url| {
        mediarch_site::app(mediarch_site::AppState::new(base_url, &backend))
    })
    .await
}

/// Serve the admin dashboard over `backend`, with the test admin registered.
pub async fn spawn_admin(backend: &MemoryBackend) -> TestServer {
    backend.add_admin(ADMIN_EMAIL, ADMIN_PASSWORD);
    let backend = backend.clone();
    TestServer::spawn(move |base_url| {
        mediarch_admin::app(mediarch_admin::AppState::new(base_url, backend))
    })
    .await
}

/// Location header of a redirect response.
#[must_use]
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
