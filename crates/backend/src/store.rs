//! Data-store seam.
//!
//! One method per remote call the surfaces make. Implemented by
//! [`SupabaseClient`](crate::supabase::SupabaseClient) for production and by
//! [`MemoryBackend`](crate::memory::MemoryBackend) for tests.

use std::sync::Arc;

use mediarch_core::{
    Contact, ContactId, ContactStatus, NewContact, NewSubscription, NewsletterSubscription,
    SubscriptionId, SubscriptionStatus,
};

use crate::auth::AuthSession;
use crate::error::StoreError;

/// CRUD access to the `contacts` and `newsletter_subscriptions` tables.
#[async_trait::async_trait]
pub trait DataStore: Send + Sync {
    /// Insert one subscription. A duplicate email yields [`StoreError::Conflict`].
    ///
    /// Inserts come from the anonymous role, which may not read rows back, so
    /// nothing is returned.
    async fn insert_subscription(&self, new: &NewSubscription) -> Result<(), StoreError>;

    /// Insert one contact enquiry. Nothing is read back.
    async fn insert_contact(&self, new: &NewContact) -> Result<(), StoreError>;

    /// All contacts, newest first.
    async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError>;

    /// All subscriptions, newest first.
    async fn list_subscriptions(&self) -> Result<Vec<NewsletterSubscription>, StoreError>;

    async fn mark_contact_read(&self, id: ContactId) -> Result<(), StoreError>;

    async fn set_contact_status(
        &self,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<(), StoreError>;

    async fn set_subscription_status(
        &self,
        id: SubscriptionId,
        status: SubscriptionStatus,
    ) -> Result<(), StoreError>;

    async fn delete_contact(&self, id: ContactId) -> Result<(), StoreError>;

    async fn delete_subscription(&self, id: SubscriptionId) -> Result<(), StoreError>;
}

/// Hands out stores bound to a caller identity.
///
/// Row-level security decides what each identity may touch, so the public
/// site and an admin session get differently-authorized handles.
pub trait StoreProvider: Send + Sync {
    /// Store acting as the anonymous public role.
    fn anonymous(&self) -> Arc<dyn DataStore>;

    /// Store acting as the signed-in user of `session`.
    fn for_session(&self, session: &AuthSession) -> Arc<dyn DataStore>;
}
