//! Public contact enquiry form.

use mediarch_core::{Email, EmailError, NewContact};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::error::StoreError;
use crate::store::DataStore;

const MAX_NAME_LENGTH: usize = 200;
const MAX_MESSAGE_LENGTH: usize = 5000;

/// Raw form input as posted by the browser. Absent fields read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Why a contact submission was not stored.
#[derive(Debug, Error)]
pub enum ContactFormError {
    #[error("Please enter a valid email address.")]
    InvalidEmail(#[source] EmailError),

    #[error("Name and message are required.")]
    MissingField,

    #[error("{field} is too long (max {max} characters).")]
    TooLong { field: &'static str, max: usize },

    #[error("Something went wrong. Please try again.")]
    Store(#[from] StoreError),
}

impl ContactSubmission {
    /// Trim, validate and build the insert payload.
    ///
    /// # Errors
    ///
    /// Returns a validation variant of [`ContactFormError`].
    pub fn validate(&self) -> Result<NewContact, ContactFormError> {
        let email = Email::parse(&self.email).map_err(ContactFormError::InvalidEmail)?;
        let name = self.name.trim();
        let message = self.message.trim();

        if name.is_empty() || message.is_empty() {
            return Err(ContactFormError::MissingField);
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ContactFormError::TooLong {
                field: "Name",
                max: MAX_NAME_LENGTH,
            });
        }
        if message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(ContactFormError::TooLong {
                field: "Message",
                max: MAX_MESSAGE_LENGTH,
            });
        }

        Ok(NewContact {
            name: name.to_string(),
            email,
            message: message.to_string(),
        })
    }

    /// Validate and insert one `pending`, unread contact.
    ///
    /// # Errors
    ///
    /// Returns a validation error without calling the store, or
    /// [`ContactFormError::Store`] if the insert fails.
    #[instrument(skip(self, store), fields(email = %self.email.trim()))]
    pub async fn submit(&self, store: &dyn DataStore) -> Result<(), ContactFormError> {
        let new = self.validate()?;

        match store.insert_contact(&new).await {
            Ok(()) => {
                info!("Contact enquiry stored");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to store contact enquiry");
                Err(e.into())
            }
        }
    }
}
