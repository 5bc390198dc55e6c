//! Display-ready snapshots of a [`Dashboard`] for the templates.
//!
//! Everything a template prints is computed here so the templates stay
//! logic-free.

use chrono::{DateTime, Utc};
use mediarch_backend::Notice;
use mediarch_backend::dashboard::{Dashboard, DeleteTarget, Tab};
use mediarch_core::{Contact, ContactStatus, NewsletterSubscription, StatusBadge, SubscriptionStatus};

/// A status a contact can be moved to, with its button label.
#[derive(Debug, Clone, Copy)]
pub struct StatusAction {
    pub value: &'static str,
    pub label: &'static str,
}

/// Offered on every contact row and in the detail dialog, whatever the
/// current status.
pub const STATUS_ACTIONS: [StatusAction; 2] = [
    StatusAction {
        value: ContactStatus::Responded.as_str(),
        label: "Accept",
    },
    StatusAction {
        value: ContactStatus::Rejected.as_str(),
        label: "Reject",
    },
];

/// Format a timestamp as `YYYY-MM-DD HH:MM UTC`.
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

const PREVIEW_CHARS: usize = 80;

fn preview(message: &str) -> String {
    let mut chars = message.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[derive(Debug, Clone)]
pub struct ContactRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub preview: String,
    pub created_at: String,
    pub badge: StatusBadge,
    pub read: bool,
    pub actions: &'static [StatusAction],
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            name: contact.name.clone(),
            email: contact.email.to_string(),
            preview: preview(&contact.message),
            created_at: format_timestamp(&contact.created_at),
            badge: contact.badge(),
            read: contact.read,
            actions: &STATUS_ACTIONS,
        }
    }
}

/// The open detail dialog.
#[derive(Debug, Clone)]
pub struct ContactDetail {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mailto: String,
    pub message: String,
    pub created_at: String,
    pub badge: StatusBadge,
    pub actions: &'static [StatusAction],
}

impl From<&Contact> for ContactDetail {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            name: contact.name.clone(),
            email: contact.email.to_string(),
            mailto: contact.email.mailto(),
            message: contact.message.clone(),
            created_at: format_timestamp(&contact.created_at),
            badge: contact.badge(),
            actions: &STATUS_ACTIONS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriptionRow {
    pub id: String,
    pub email: String,
    pub created_at: String,
    pub badge: StatusBadge,
    pub toggle_label: &'static str,
}

impl From<&NewsletterSubscription> for SubscriptionRow {
    fn from(subscription: &NewsletterSubscription) -> Self {
        let toggle_label = match subscription.status {
            SubscriptionStatus::Active => "Unsubscribe",
            SubscriptionStatus::Unsubscribed => "Reactivate",
        };
        Self {
            id: subscription.id.to_string(),
            email: subscription.email.to_string(),
            created_at: format_timestamp(&subscription.created_at),
            badge: subscription.badge(),
            toggle_label,
        }
    }
}

/// The delete confirmation dialog.
#[derive(Debug, Clone)]
pub struct DeleteDialog {
    pub warning: &'static str,
    /// Confirm renders disabled while the delete is in flight.
    pub deleting: bool,
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub tab: &'static str,
    pub admin_email: String,
    pub contacts: Vec<ContactRow>,
    pub subscriptions: Vec<SubscriptionRow>,
    pub unread_count: usize,
    pub detail: Option<ContactDetail>,
    pub delete_dialog: Option<DeleteDialog>,
    pub notices: Vec<Notice>,
}

impl DashboardView {
    /// Snapshot `dashboard`, draining its queued notices.
    pub fn render(dashboard: &mut Dashboard, tab: Tab, admin_email: &str) -> Self {
        Self {
            tab: tab.as_str(),
            admin_email: admin_email.to_string(),
            contacts: dashboard.contacts().iter().map(ContactRow::from).collect(),
            subscriptions: dashboard
                .subscriptions()
                .iter()
                .map(SubscriptionRow::from)
                .collect(),
            unread_count: dashboard.unread_count(),
            detail: dashboard.selected_contact().map(ContactDetail::from),
            delete_dialog: dashboard.pending_delete().map(|target: DeleteTarget| DeleteDialog {
                warning: target.warning(),
                deleting: dashboard.is_deleting(),
            }),
            notices: dashboard.take_notices(),
        }
    }

    #[must_use]
    pub fn is_contacts_tab(&self) -> bool {
        self.tab == Tab::Contacts.as_str()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use askama::Template;
    use chrono::TimeZone;
    use mediarch_backend::MemoryBackend;

    use super::*;
    use crate::routes::dashboard::DashboardTemplate;

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 5, 59).unwrap();
        assert_eq!(format_timestamp(&at), "2025-03-01 09:05 UTC");
    }

    #[test]
    fn test_preview_truncates_long_messages() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(PREVIEW_CHARS + 5);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_detail_offers_both_status_actions() {
        let backend = MemoryBackend::new();
        let mut contact = backend.seed_contact("Ada", "ada@example.com", "hi").unwrap();
        contact.status = ContactStatus::Responded;

        let detail = ContactDetail::from(&contact);
        let values: Vec<_> = detail.actions.iter().map(|a| a.value).collect();
        assert_eq!(values, ["responded", "rejected"]);
        assert_eq!(detail.badge.label, "Accepted");
        assert_eq!(detail.mailto, "mailto:ada@example.com");

        let row = ContactRow::from(&contact);
        assert_eq!(row.actions.len(), 2);
    }

    async fn dashboard_with_contact(backend: &MemoryBackend) -> (Dashboard, Contact) {
        let contact = backend.seed_contact("Ada", "ada@example.com", "hi").unwrap();
        let mut dashboard = Dashboard::new();
        dashboard.load(backend).await;
        (dashboard, contact)
    }

    fn page(dashboard: &mut Dashboard) -> String {
        let view = DashboardView::render(dashboard, Tab::Contacts, "admin@mediarch.gg");
        DashboardTemplate { view }.render().unwrap()
    }

    #[tokio::test]
    async fn test_rows_carry_both_status_forms() {
        let backend = MemoryBackend::new();
        let (mut dashboard, contact) = dashboard_with_contact(&backend).await;

        let html = page(&mut dashboard);
        let action = format!("action=\"/admin/contacts/{}/status\"", contact.id);
        assert_eq!(html.matches(&action).count(), 2);
        assert!(html.contains("name=\"status\" value=\"responded\""));
        assert!(html.contains("name=\"status\" value=\"rejected\""));
        assert!(html.contains("data-tone=\"pending\""));
    }

    #[tokio::test]
    async fn test_confirm_is_disabled_while_delete_in_flight() {
        let backend = MemoryBackend::new();
        let (mut dashboard, contact) = dashboard_with_contact(&backend).await;
        assert!(dashboard.request_delete(DeleteTarget::Contact(contact.id)));

        let html = page(&mut dashboard);
        assert!(html.contains("Are you sure?"));
        assert!(!html.contains("Deleting..."));

        assert!(dashboard.begin_delete().is_some());
        let html = page(&mut dashboard);
        assert!(html.contains("Deleting..."));
        assert!(html.contains("class=\"danger\" disabled"));
    }

    #[tokio::test]
    async fn test_render_drains_notices() {
        let backend = MemoryBackend::new();
        backend.seed_contact("Ada", "ada@example.com", "hi").unwrap();
        let mut dashboard = Dashboard::new();
        backend.fail_next("timeout");
        dashboard.load(&backend).await;
        dashboard.load(&backend).await;

        let view = DashboardView::render(&mut dashboard, Tab::Contacts, "admin@mediarch.gg");
        assert_eq!(view.notices.len(), 1);
        assert_eq!(view.unread_count, 1);
        assert!(view.is_contacts_tab());

        let again = DashboardView::render(&mut dashboard, Tab::Contacts, "admin@mediarch.gg");
        assert!(again.notices.is_empty());
    }
}
