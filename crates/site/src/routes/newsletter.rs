//! Newsletter signup handler.
//!
//! The footer form posts here. HTMX requests get the form fragment back with
//! the outcome notice; plain form posts get the whole page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use mediarch_backend::Notice;
use mediarch_backend::newsletter::{NewsletterForm, SubmitOutcome};
use serde::Deserialize;
use tracing::instrument;

use super::home::HomeTemplate;
use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// What the signup form renders.
#[derive(Debug, Clone, Default)]
pub struct NewsletterView {
    /// Value echoed back into the input
    pub email: String,
    pub submitting: bool,
    pub notice: Option<Notice>,
}

impl NewsletterView {
    /// View of `form` after a submit resolved to `outcome`.
    #[must_use]
    pub fn after(form: &NewsletterForm, outcome: &SubmitOutcome) -> Self {
        Self {
            email: form.email().to_string(),
            submitting: form.is_submitting(),
            notice: outcome.notice(),
        }
    }
}

/// Form fragment swapped in by HTMX.
#[derive(Template, WebTemplate)]
#[template(path = "newsletter_fragment.html")]
pub struct NewsletterFragment {
    pub newsletter: NewsletterView,
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Subscribe an address to the newsletter.
#[instrument(skip(state, headers, form), fields(email = %form.email.trim()))]
pub async fn subscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SubscribeForm>,
) -> Response {
    let mut signup = NewsletterForm::with_email(form.email);
    let outcome = signup.submit(state.store()).await;

    if outcome.is_success() {
        add_breadcrumb("newsletter", "Subscribed to newsletter");
    }

    let newsletter = NewsletterView::after(&signup, &outcome);
    if is_htmx(&headers) {
        NewsletterFragment { newsletter }.into_response()
    } else {
        HomeTemplate::new(&state, newsletter).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use mediarch_backend::NoticeVariant;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_view_keeps_input_on_invalid_email() {
        let form = NewsletterForm::with_email("nope");
        let view = NewsletterView::after(&form, &SubmitOutcome::InvalidEmail);

        assert_eq!(view.email, "nope");
        assert!(!view.submitting);
        assert!(
            view.notice
                .is_some_and(|n| n.variant == NoticeVariant::Destructive)
        );
    }
}
