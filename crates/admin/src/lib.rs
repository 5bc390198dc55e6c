//! Mediarch admin dashboard.
//!
//! Lets a signed-in admin moderate contact enquiries and newsletter
//! subscriptions stored in Supabase.
//!
//! # Architecture
//!
//! - Axum web framework, Askama templates, plain form posts
//! - `tower-sessions` cookie sessions holding the Supabase tokens
//! - One [`Dashboard`](mediarch_backend::dashboard::Dashboard) per login,
//!   kept in a [`DashboardRegistry`](dashboards::DashboardRegistry)
//! - Row-level security in Supabase is the real authorization boundary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod dashboards;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod views;

use axum::http::{Request, Response};
use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use config::AdminConfig;
pub use error::AppError;
pub use state::AppState;

/// Build the complete admin application.
///
/// Layers (outermost first): Sentry, trace span, request ID, security
/// headers, session.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.secure_cookies());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new("crates/admin/static"))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri().path(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use mediarch_backend::MemoryBackend;
    use tower::ServiceExt;
    use url::Url;

    use super::*;

    fn test_app() -> Router {
        app(AppState::new(
            Url::parse("http://127.0.0.1:3001").unwrap(),
            MemoryBackend::new(),
        ))
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let resp = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store, max-age=0"
        );
    }

    #[tokio::test]
    async fn test_moderation_routes_redirect_to_login() {
        for (method, uri) in [
            ("GET", "/admin"),
            ("POST", "/admin/refresh"),
            ("POST", "/admin/delete/confirm"),
            ("GET", "/admin/subscriptions/5b0c1f8e-4c58-4a7e-9d55-2f1d8c0e6a11/mail"),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::empty())
                .unwrap();
            let resp = test_app().oneshot(request).await.unwrap();
            assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{method} {uri}");
            assert_eq!(
                resp.headers().get(header::LOCATION).unwrap(),
                middleware::LOGIN_PATH
            );
        }
    }
}
