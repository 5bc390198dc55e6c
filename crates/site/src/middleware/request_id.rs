//! Request ID middleware for request tracing and correlation.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuse an upstream ID only if it is short, visible ASCII.
fn upstream_id(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?.trim();
    let acceptable = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| id.to_string())
}

/// Ensure every request carries an `x-request-id`.
///
/// An ID from Cloudflare or another proxy is kept; otherwise a UUID v4 is
/// generated. The ID is recorded on the current span, tagged on the Sentry
/// scope and echoed in the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(upstream_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_filtering() {
        assert_eq!(
            upstream_id(&HeaderValue::from_static("cf-8d2a")).as_deref(),
            Some("cf-8d2a")
        );
        assert_eq!(upstream_id(&HeaderValue::from_static("has space")), None);
        assert_eq!(upstream_id(&HeaderValue::from_static("")), None);

        let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        assert!(HeaderValue::from_str(&long).is_ok_and(|v| upstream_id(&v).is_none()));
    }
}
