//! Newsletter signup form.
//!
//! The footer form holds the typed address and a `submitting` flag. A submit
//! validates locally, inserts one `active` subscription, and resolves to one
//! of three disjoint outcomes: subscribed, already subscribed, or failed.

use mediarch_core::{Email, NewSubscription};
use tracing::{debug, error, info, instrument};

use crate::error::StoreError;
use crate::notice::Notice;
use crate::store::DataStore;

const FAILURE_FALLBACK: &str = "Failed to subscribe. Please try again later.";

/// Result of one submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new `active` subscription was stored.
    Subscribed,
    /// The address is already on the list. Not a failure.
    AlreadySubscribed,
    /// Rejected before any remote call.
    InvalidEmail,
    /// The store failed; carries its message (possibly empty).
    Failed(String),
    /// A submit was already in flight; nothing happened.
    Busy,
}

impl SubmitOutcome {
    /// The notice to show, if any.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Subscribed => Some(Notice::new(
                "Success!",
                "You've been subscribed to our newsletter",
            )),
            Self::AlreadySubscribed => Some(Notice::new(
                "Already Subscribed",
                "This email is already subscribed to our newsletter",
            )),
            Self::InvalidEmail => Some(Notice::destructive(
                "Invalid Email",
                "Please enter a valid email address",
            )),
            Self::Failed(message) => {
                let description = if message.trim().is_empty() {
                    FAILURE_FALLBACK
                } else {
                    message.as_str()
                };
                Some(Notice::destructive("Error", description))
            }
            Self::Busy => None,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Subscribed)
    }
}

/// State of the signup form.
#[derive(Debug, Clone, Default)]
pub struct NewsletterForm {
    email: String,
    submitting: bool,
}

impl NewsletterForm {
    /// A form pre-filled with `email` (as typed).
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            submitting: false,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Whether the submit control should render disabled.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate the input and mark the form as submitting.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitOutcome::Busy`] if a submit is in flight, or
    /// [`SubmitOutcome::InvalidEmail`] if the input is not an address. No
    /// remote call should be made in either case.
    pub fn begin_submit(&mut self) -> Result<Email, SubmitOutcome> {
        if self.submitting {
            return Err(SubmitOutcome::Busy);
        }

        let email = Email::parse(&self.email).map_err(|e| {
            debug!(error = %e, "Rejected newsletter email");
            SubmitOutcome::InvalidEmail
        })?;

        self.submitting = true;
        Ok(email)
    }

    /// Apply the insert result and clear the submitting flag.
    ///
    /// Only a successful insert clears the input.
    pub fn finish_submit(&mut self, result: Result<(), StoreError>) -> SubmitOutcome {
        self.submitting = false;

        match result {
            Ok(()) => {
                info!(email = %self.email.trim(), "Newsletter subscription created");
                self.email.clear();
                SubmitOutcome::Subscribed
            }
            Err(e) if e.is_conflict() => {
                info!(email = %self.email.trim(), "Newsletter email already subscribed");
                SubmitOutcome::AlreadySubscribed
            }
            Err(e) => {
                error!(error = %e, email = %self.email.trim(), "Newsletter signup failed");
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }

    /// Validate, insert, and resolve the outcome.
    #[instrument(skip(self, store), fields(email = %self.email.trim()))]
    pub async fn submit(&mut self, store: &dyn DataStore) -> SubmitOutcome {
        let email = match self.begin_submit() {
            Ok(email) => email,
            Err(outcome) => return outcome,
        };

        let result = store
            .insert_subscription(&NewSubscription::active(email))
            .await;
        self.finish_submit(result)
    }
}
