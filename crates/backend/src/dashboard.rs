//! Admin moderation view model.
//!
//! A [`Dashboard`] is the per-session state behind the admin page: the two
//! local lists, the detail dialog, the delete confirmation and the queued
//! notices. Mutations call the store once and then patch the local lists by
//! id (replace-in-place or filter-out). Only [`Dashboard::load`] re-fetches.
//!
//! Deletion is split into [`Dashboard::begin_delete`] and
//! [`Dashboard::finish_delete`] so a caller holding the dashboard behind a
//! lock can release it while the remote call runs. In between, the
//! `deleting` flag is visible to other readers and the confirm control
//! renders disabled.

use mediarch_core::{
    Contact, ContactId, ContactStatus, NewsletterSubscription, SubscriptionId, SubscriptionStatus,
};
use tracing::{error, info, instrument, warn};

use crate::error::StoreError;
use crate::notice::Notice;
use crate::store::DataStore;

/// Which list the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Contacts,
    Newsletter,
}

impl Tab {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::Newsletter => "newsletter",
        }
    }

    /// Parse a `?tab=` value, falling back to contacts.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("newsletter") => Self::Newsletter,
            _ => Self::Contacts,
        }
    }
}

/// A record awaiting delete confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Contact(ContactId),
    Subscription(SubscriptionId),
}

impl DeleteTarget {
    /// Body text of the confirmation dialog.
    #[must_use]
    pub const fn warning(self) -> &'static str {
        match self {
            Self::Contact(_) => {
                "This action cannot be undone. This will permanently delete the contact enquiry."
            }
            Self::Subscription(_) => {
                "This action cannot be undone. This will permanently delete this newsletter subscription."
            }
        }
    }

    /// The tab the target lives on.
    #[must_use]
    pub const fn tab(self) -> Tab {
        match self {
            Self::Contact(_) => Tab::Contacts,
            Self::Subscription(_) => Tab::Newsletter,
        }
    }
}

/// Per-session moderation state.
#[derive(Debug, Default)]
pub struct Dashboard {
    contacts: Vec<Contact>,
    subscriptions: Vec<NewsletterSubscription>,
    loaded: bool,
    selected_contact: Option<ContactId>,
    pending_delete: Option<DeleteTarget>,
    deleting: bool,
    notices: Vec<Notice>,
}

impl Dashboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    #[must_use]
    pub fn subscriptions(&self) -> &[NewsletterSubscription] {
        &self.subscriptions
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.contacts.iter().filter(|c| !c.read).count()
    }

    /// The contact shown in the detail dialog, read from the local list so
    /// status changes show up immediately.
    #[must_use]
    pub fn selected_contact(&self) -> Option<&Contact> {
        let id = self.selected_contact?;
        self.contacts.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub const fn pending_delete(&self) -> Option<DeleteTarget> {
        self.pending_delete
    }

    /// Whether a delete is in flight; the confirm control is disabled.
    #[must_use]
    pub const fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Drain queued notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch both lists concurrently and replace local state.
    ///
    /// A failed fetch keeps the previous list and queues an error notice.
    #[instrument(skip_all)]
    pub async fn load(&mut self, store: &dyn DataStore) {
        let (contacts, subscriptions) =
            tokio::join!(store.list_contacts(), store.list_subscriptions());

        match contacts {
            Ok(rows) => {
                info!(count = rows.len(), "Contacts fetched");
                self.contacts = rows;
            }
            Err(e) => {
                error!(error = %e, "Error fetching contacts");
                self.notices
                    .push(Notice::store_failure(&e, "Failed to fetch contacts"));
            }
        }

        match subscriptions {
            Ok(rows) => {
                info!(count = rows.len(), "Subscriptions fetched");
                self.subscriptions = rows;
            }
            Err(e) => {
                error!(error = %e, "Error fetching subscriptions");
                self.notices.push(Notice::store_failure(
                    &e,
                    "Failed to fetch newsletter subscriptions",
                ));
            }
        }

        self.loaded = true;
    }

    /// Load once per dashboard; later mounts reuse the local lists.
    pub async fn ensure_loaded(&mut self, store: &dyn DataStore) {
        if !self.loaded {
            self.load(store).await;
        }
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    /// Open the detail dialog and mark the contact read if it is unread.
    ///
    /// Returns `false` if the contact is not in the local list.
    #[instrument(skip(self, store), fields(contact_id = %id))]
    pub async fn view_contact(&mut self, store: &dyn DataStore, id: ContactId) -> bool {
        let Some(read) = self.contacts.iter().find(|c| c.id == id).map(|c| c.read) else {
            warn!("Contact not in local list");
            self.notices
                .push(Notice::destructive("Error", "Contact not found"));
            return false;
        };

        self.selected_contact = Some(id);

        if !read {
            match store.mark_contact_read(id).await {
                Ok(()) => {
                    if let Some(contact) = self.contacts.iter_mut().find(|c| c.id == id) {
                        contact.read = true;
                    }
                }
                Err(e) => {
                    error!(error = %e, "Error marking contact as read");
                    self.notices
                        .push(Notice::store_failure(&e, "Failed to mark as read"));
                }
            }
        }

        true
    }

    /// Close the detail dialog. Refused while a delete is in flight.
    pub fn close_detail(&mut self) -> bool {
        if self.deleting {
            return false;
        }
        self.selected_contact = None;
        true
    }

    /// Set a contact's status. Any transition is allowed.
    #[instrument(skip(self, store), fields(contact_id = %id, status = %status))]
    pub async fn set_contact_status(
        &mut self,
        store: &dyn DataStore,
        id: ContactId,
        status: ContactStatus,
    ) {
        match store.set_contact_status(id, status).await {
            Ok(()) => {
                if let Some(contact) = self.contacts.iter_mut().find(|c| c.id == id) {
                    contact.status = status;
                }
                info!("Contact status updated");
                self.notices
                    .push(Notice::success(format!("Contact marked as {status}")));
            }
            Err(e) => {
                error!(error = %e, "Error updating contact status");
                self.notices.push(Notice::store_failure(
                    &e,
                    &format!("Failed to update status to {status}"),
                ));
            }
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    #[instrument(skip(self, store), fields(subscription_id = %id, status = %status))]
    pub async fn set_subscription_status(
        &mut self,
        store: &dyn DataStore,
        id: SubscriptionId,
        status: SubscriptionStatus,
    ) {
        match store.set_subscription_status(id, status).await {
            Ok(()) => {
                if let Some(subscription) = self.subscriptions.iter_mut().find(|s| s.id == id) {
                    subscription.status = status;
                }
                info!("Subscription status updated");
                self.notices
                    .push(Notice::success(format!("Subscription marked as {status}")));
            }
            Err(e) => {
                error!(error = %e, "Error updating subscription status");
                self.notices.push(Notice::store_failure(
                    &e,
                    &format!("Failed to update subscription status to {status}"),
                ));
            }
        }
    }

    /// Flip `active` <-> `unsubscribed` based on the locally known status.
    pub async fn toggle_subscription(&mut self, store: &dyn DataStore, id: SubscriptionId) {
        let Some(current) = self
            .subscriptions
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.status)
        else {
            warn!(subscription_id = %id, "Subscription not in local list");
            self.notices
                .push(Notice::destructive("Error", "Subscription not found"));
            return;
        };

        self.set_subscription_status(store, id, current.toggled())
            .await;
    }

    /// `mailto:` URL for a subscriber. No store interaction.
    #[must_use]
    pub fn mailto_url(&self, id: SubscriptionId) -> Option<String> {
        self.subscriptions
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.email.mailto())
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Open the confirmation dialog for `target`. Ignored while deleting.
    pub fn request_delete(&mut self, target: DeleteTarget) -> bool {
        if self.deleting {
            return false;
        }
        self.pending_delete = Some(target);
        true
    }

    /// Dismiss the confirmation dialog. Ignored while deleting.
    pub fn cancel_delete(&mut self) -> bool {
        if self.deleting {
            return false;
        }
        self.pending_delete = None;
        true
    }

    /// Claim the pending delete and mark the dashboard busy.
    ///
    /// Returns `None` if nothing is pending or a delete is already in flight,
    /// so a repeated confirm is a no-op.
    pub fn begin_delete(&mut self) -> Option<DeleteTarget> {
        if self.deleting {
            return None;
        }
        let target = self.pending_delete?;
        self.deleting = true;
        Some(target)
    }

    /// Issue the remote delete for `target`.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn perform_delete(
        store: &dyn DataStore,
        target: DeleteTarget,
    ) -> Result<(), StoreError> {
        match target {
            DeleteTarget::Contact(id) => store.delete_contact(id).await,
            DeleteTarget::Subscription(id) => store.delete_subscription(id).await,
        }
    }

    /// Apply a delete result and clear the busy flag.
    ///
    /// On success the record leaves the local list, the dialog closes, and a
    /// viewed contact's detail dialog closes too. On failure the confirmation
    /// stays open.
    pub fn finish_delete(&mut self, target: DeleteTarget, result: Result<(), StoreError>) {
        self.deleting = false;

        match (target, result) {
            (DeleteTarget::Contact(id), Ok(())) => {
                self.contacts.retain(|c| c.id != id);
                if self.selected_contact == Some(id) {
                    self.selected_contact = None;
                }
                self.pending_delete = None;
                info!(contact_id = %id, "Contact deleted");
                self.notices
                    .push(Notice::success("Contact deleted successfully"));
            }
            (DeleteTarget::Subscription(id), Ok(())) => {
                self.subscriptions.retain(|s| s.id != id);
                self.pending_delete = None;
                info!(subscription_id = %id, "Subscription deleted");
                self.notices.push(Notice::success(
                    "Newsletter subscription deleted successfully",
                ));
            }
            (DeleteTarget::Contact(id), Err(e)) => {
                error!(contact_id = %id, error = %e, "Error deleting contact");
                self.notices
                    .push(Notice::store_failure(&e, "Failed to delete contact"));
            }
            (DeleteTarget::Subscription(id), Err(e)) => {
                error!(subscription_id = %id, error = %e, "Error deleting subscription");
                self.notices
                    .push(Notice::store_failure(&e, "Failed to delete subscription"));
            }
        }
    }
}
