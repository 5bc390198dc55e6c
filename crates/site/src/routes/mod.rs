//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /              - Home page with footer
//! POST /newsletter    - Newsletter signup (form; HTMX fragment when HX-Request)
//! POST /contact       - Contact enquiry (JSON)
//! ```
//!
//! `/health` and `/static` are mounted by [`crate::app`].

pub mod contact;
pub mod home;
pub mod newsletter;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::form_rate_limiter;
use crate::state::AppState;

/// Create the site router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(form_routes())
}

/// Public write endpoints, rate limited per client IP.
fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/newsletter", post(newsletter::subscribe))
        .route("/contact", post(contact::submit))
        .layer(form_rate_limiter())
}
