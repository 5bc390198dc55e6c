//! Row types for the `contacts` and `newsletter_subscriptions` tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::badge::{StatusBadge, status_badge};
use super::email::Email;
use super::id::{ContactId, SubscriptionId};
use super::status::{ContactStatus, SubscriptionStatus};

/// A contact enquiry submitted through the public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: Email,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ContactStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
}

impl Contact {
    #[must_use]
    pub fn badge(&self) -> StatusBadge {
        status_badge(self.status.as_str())
    }
}

/// A newsletter opt-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSubscription {
    pub id: SubscriptionId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: SubscriptionStatus,
}

impl NewsletterSubscription {
    #[must_use]
    pub fn badge(&self) -> StatusBadge {
        status_badge(self.status.as_str())
    }
}

/// Insert payload for `newsletter_subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSubscription {
    pub email: Email,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

impl NewSubscription {
    /// An `active` subscription stamped with the current time.
    #[must_use]
    pub fn active(email: Email) -> Self {
        Self {
            email,
            status: SubscriptionStatus::Active,
            created_at: Utc::now(),
        }
    }
}

/// Insert payload for `contacts`.
///
/// `id`, `created_at`, `status` and `read` are left to the store defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewContact {
    pub name: String,
    pub email: Email,
    pub message: String,
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
