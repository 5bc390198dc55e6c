//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use super::newsletter::NewsletterView;
use crate::footer::Footer;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub canonical_url: String,
    pub footer: Footer,
    pub newsletter: NewsletterView,
}

impl HomeTemplate {
    #[must_use]
    pub fn new(state: &AppState, newsletter: NewsletterView) -> Self {
        Self {
            canonical_url: state.base_url().to_string(),
            footer: Footer::current(),
            newsletter,
        }
    }
}

/// Display the home page with an empty signup form.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    HomeTemplate::new(&state, NewsletterView::default())
}
