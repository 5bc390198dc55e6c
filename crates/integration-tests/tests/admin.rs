//! Integration tests for the admin dashboard.

#![allow(clippy::unwrap_used)]

use mediarch_backend::MemoryBackend;
use mediarch_backend::memory::Call;
use mediarch_core::{ContactStatus, SubscriptionStatus};
use mediarch_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, TestServer, location, spawn_admin};
use reqwest::StatusCode;

async fn sign_in(admin: &TestServer) {
    let resp = admin
        .client
        .post(admin.url("/admin/login"))
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .send()
        .await
        .expect("Failed to post login form");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin");
}

async fn get(admin: &TestServer, path: &str) -> reqwest::Response {
    admin
        .client
        .get(admin.url(path))
        .send()
        .await
        .expect("Failed to send GET")
}

async fn post(admin: &TestServer, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
    let resp = admin
        .client
        .post(admin.url(path))
        .form(form)
        .send()
        .await
        .expect("Failed to send POST");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "POST {path}");
    resp
}

async fn dashboard(admin: &TestServer, tab: &str) -> String {
    let resp = get(admin, &format!("/admin?tab={tab}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.unwrap()
}

fn count(backend: &MemoryBackend, matches: impl Fn(&Call) -> bool) -> usize {
    backend.calls().iter().filter(|&c| matches(c)).count()
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_dashboard_requires_login() {
    let admin = spawn_admin(&MemoryBackend::new()).await;

    let resp = get(&admin, "/admin").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/login");

    let resp = get(&admin, "/admin/login").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("x-robots-tag").unwrap(),
        "noindex, nofollow"
    );
}

#[tokio::test]
async fn test_login_failures() {
    let backend = MemoryBackend::new();
    let admin = spawn_admin(&backend).await;

    let resp = admin
        .client
        .post(admin.url("/admin/login"))
        .form(&[("email", ADMIN_EMAIL), ("password", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(backend.calls().is_empty(), "blank fields never reach the auth service");

    let resp = admin
        .client
        .post(admin.url("/admin/login"))
        .form(&[("email", ADMIN_EMAIL), ("password", "hunter2")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Invalid login credentials"));
    assert!(body.contains(ADMIN_EMAIL), "email is kept in the form");

    let resp = get(&admin, "/admin").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_loads_both_lists_once() {
    let backend = MemoryBackend::new();
    backend
        .seed_contact("Ada", "ada@example.com", "Do you rent pods?")
        .unwrap();
    backend
        .seed_subscription("fan@example.com", SubscriptionStatus::Active)
        .unwrap();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;

    let body = dashboard(&admin, "contacts").await;
    assert!(body.contains("ada@example.com"));
    assert!(body.contains("Do you rent pods?"));
    assert!(body.contains("Pending"));
    assert!(body.contains("<span class=\"pill\">1</span>"), "one unread");

    let body = dashboard(&admin, "newsletter").await;
    assert!(body.contains("fan@example.com"));
    assert!(body.contains("Unsubscribe"));

    assert_eq!(count(&backend, |c| matches!(c, Call::ListContacts)), 1);
    assert_eq!(count(&backend, |c| matches!(c, Call::ListSubscriptions)), 1);

    post(&admin, "/admin/refresh", &[("tab", "newsletter")]).await;
    assert_eq!(count(&backend, |c| matches!(c, Call::ListContacts)), 2);
    assert_eq!(count(&backend, |c| matches!(c, Call::ListSubscriptions)), 2);

    let resp = get(&admin, "/admin/login").await;
    assert_eq!(location(&resp), "/admin", "signed-in admins skip the login page");
}

#[tokio::test]
async fn test_logout_flashes_and_ends_session() {
    let backend = MemoryBackend::new();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    dashboard(&admin, "contacts").await;

    let resp = post(&admin, "/admin/logout", &[]).await;
    assert_eq!(location(&resp), "/admin/login");
    assert!(backend.calls().contains(&Call::SignOut));

    let body = get(&admin, "/admin/login").await.text().await.unwrap();
    assert!(body.contains("Logged out successfully"));

    let body = get(&admin, "/admin/login").await.text().await.unwrap();
    assert!(!body.contains("Logged out successfully"), "flash shows once");

    let resp = get(&admin, "/admin").await;
    assert_eq!(location(&resp), "/admin/login");
}

#[tokio::test]
async fn test_revoked_login_is_sent_back_to_sign_in() {
    let backend = MemoryBackend::new();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    dashboard(&admin, "contacts").await;

    backend.revoke_tokens();

    let resp = get(&admin, "/admin").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/login");

    let body = get(&admin, "/admin/login").await.text().await.unwrap();
    assert!(body.contains("Session expired"));
}

#[tokio::test]
async fn test_expired_login_is_refreshed_and_kept() {
    let backend = MemoryBackend::new();
    backend.seed_contact("Ada", "ada@example.com", "Hello").unwrap();
    backend.set_token_lifetime(chrono::Duration::seconds(-1));
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    backend.set_token_lifetime(chrono::Duration::hours(1));

    let body = dashboard(&admin, "contacts").await;
    assert!(body.contains("ada@example.com"), "lists load with the new token");
    assert_eq!(count(&backend, |c| matches!(c, Call::RefreshSession)), 1);
    assert_eq!(count(&backend, |c| matches!(c, Call::GetUser)), 0);

    // The refreshed tokens were stored, so the next mount validates instead
    // of refreshing again, and actions keep working.
    dashboard(&admin, "contacts").await;
    assert_eq!(count(&backend, |c| matches!(c, Call::RefreshSession)), 1);
    assert_eq!(count(&backend, |c| matches!(c, Call::GetUser)), 1);

    post(&admin, "/admin/refresh", &[("tab", "contacts")]).await;
    assert!(
        !dashboard(&admin, "contacts").await.contains("JWT expired"),
        "store accepts the refreshed token"
    );
}

#[tokio::test]
async fn test_expired_login_with_spent_refresh_token_signs_out() {
    let backend = MemoryBackend::new();
    backend.set_token_lifetime(chrono::Duration::seconds(-1));
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    backend.revoke_tokens();

    let resp = get(&admin, "/admin").await;
    assert_eq!(location(&resp), "/admin/login");
    assert_eq!(count(&backend, |c| matches!(c, Call::RefreshSession)), 1);
}

// ============================================================================
// Contacts
// ============================================================================

#[tokio::test]
async fn test_viewing_marks_read_once() {
    let backend = MemoryBackend::new();
    let contact = backend
        .seed_contact("Ada", "ada@example.com", "Hello")
        .unwrap();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    dashboard(&admin, "contacts").await;

    let path = format!("/admin/contacts/{}", contact.id);
    let resp = get(&admin, &path).await;
    assert_eq!(location(&resp), "/admin?tab=contacts");

    let body = dashboard(&admin, "contacts").await;
    assert!(body.contains("Contact Details"));
    assert!(body.contains("mailto:ada@example.com"));
    assert!(!body.contains("class=\"pill\""), "nothing unread");

    post(&admin, "/admin/contacts/close", &[]).await;
    assert!(!dashboard(&admin, "contacts").await.contains("Contact Details"));

    get(&admin, &path).await;

    assert_eq!(
        count(&backend, |c| matches!(c, Call::MarkContactRead(_))),
        1
    );
    assert!(backend.contacts()[0].read);
}

#[tokio::test]
async fn test_status_changes() {
    let backend = MemoryBackend::new();
    let contact = backend
        .seed_contact("Ada", "ada@example.com", "Hello")
        .unwrap();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    dashboard(&admin, "contacts").await;

    let path = format!("/admin/contacts/{}/status", contact.id);

    post(&admin, &path, &[("status", "responded")]).await;
    assert_eq!(backend.contacts()[0].status, ContactStatus::Responded);
    let body = dashboard(&admin, "contacts").await;
    assert!(body.contains("Accepted"));
    assert!(body.contains("Contact marked as responded"));

    post(&admin, &path, &[("status", "rejected")]).await;
    assert_eq!(backend.contacts()[0].status, ContactStatus::Rejected);
    assert!(dashboard(&admin, "contacts").await.contains("Rejected"));
}

#[tokio::test]
async fn test_status_from_table_row_leaves_contact_unread() {
    let backend = MemoryBackend::new();
    let contact = backend
        .seed_contact("Ada", "ada@example.com", "Hello")
        .unwrap();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;

    let path = format!("/admin/contacts/{}/status", contact.id);
    let body = dashboard(&admin, "contacts").await;
    assert!(body.contains(&format!("action=\"{path}\"")), "row offers status forms");
    assert!(!body.contains("Contact Details"));

    post(&admin, &path, &[("status", "responded")]).await;
    post(&admin, &path, &[("status", "rejected")]).await;

    assert_eq!(
        count(&backend, |c| matches!(c, Call::MarkContactRead(_))),
        0
    );
    assert_eq!(
        count(&backend, |c| matches!(c, Call::SetContactStatus(..))),
        2
    );
    let stored = &backend.contacts()[0];
    assert_eq!(stored.status, ContactStatus::Rejected);
    assert!(!stored.read);
    assert!(dashboard(&admin, "contacts").await.contains("<span class=\"pill\">1</span>"));
}

#[tokio::test]
async fn test_delete_waits_for_confirmation() {
    let backend = MemoryBackend::new();
    let contact = backend
        .seed_contact("Ada", "ada@example.com", "Hello")
        .unwrap();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    dashboard(&admin, "contacts").await;

    let delete = format!("/admin/contacts/{}/delete", contact.id);
    let is_delete = |c: &Call| matches!(c, Call::DeleteContact(_));

    post(&admin, &delete, &[]).await;
    let body = dashboard(&admin, "contacts").await;
    assert!(body.contains("Are you sure?"));
    assert!(body.contains("permanently delete the contact enquiry"));
    assert_eq!(count(&backend, is_delete), 0);

    post(&admin, "/admin/delete/cancel", &[("tab", "contacts")]).await;
    assert!(!dashboard(&admin, "contacts").await.contains("Are you sure?"));
    assert_eq!(count(&backend, is_delete), 0);

    post(&admin, &delete, &[]).await;
    let resp = post(&admin, "/admin/delete/confirm", &[("tab", "contacts")]).await;
    assert_eq!(location(&resp), "/admin?tab=contacts");
    assert_eq!(count(&backend, is_delete), 1);
    assert!(backend.contacts().is_empty());

    let body = dashboard(&admin, "contacts").await;
    assert!(body.contains("Contact deleted successfully"));
    assert!(!body.contains("ada@example.com"));

    post(&admin, "/admin/delete/confirm", &[("tab", "contacts")]).await;
    assert_eq!(count(&backend, is_delete), 1, "nothing left to confirm");
}

#[tokio::test]
async fn test_failed_action_becomes_notice() {
    let backend = MemoryBackend::new();
    let contact = backend
        .seed_contact("Ada", "ada@example.com", "Hello")
        .unwrap();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    dashboard(&admin, "contacts").await;

    backend.fail_next("row-level security violation");
    post(
        &admin,
        &format!("/admin/contacts/{}/status", contact.id),
        &[("status", "rejected")],
    )
    .await;

    let body = dashboard(&admin, "contacts").await;
    assert!(body.contains("row-level security violation"));
    assert_eq!(backend.contacts()[0].status, ContactStatus::Pending);
}

// ============================================================================
// Subscriptions
// ============================================================================

#[tokio::test]
async fn test_toggle_twice_restores_status() {
    let backend = MemoryBackend::new();
    let subscription = backend
        .seed_subscription("fan@example.com", SubscriptionStatus::Active)
        .unwrap();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    dashboard(&admin, "newsletter").await;

    let toggle = format!("/admin/subscriptions/{}/toggle", subscription.id);

    let resp = post(&admin, &toggle, &[]).await;
    assert_eq!(location(&resp), "/admin?tab=newsletter");
    assert_eq!(
        backend.subscriptions()[0].status,
        SubscriptionStatus::Unsubscribed
    );
    assert!(dashboard(&admin, "newsletter").await.contains("Reactivate"));

    post(&admin, &toggle, &[]).await;
    assert_eq!(backend.subscriptions()[0].status, SubscriptionStatus::Active);
    assert_eq!(
        count(&backend, |c| matches!(c, Call::SetSubscriptionStatus(..))),
        2
    );
}

#[tokio::test]
async fn test_mail_hands_off_to_mail_client() {
    let backend = MemoryBackend::new();
    let subscription = backend
        .seed_subscription("fan@example.com", SubscriptionStatus::Active)
        .unwrap();
    let admin = spawn_admin(&backend).await;
    sign_in(&admin).await;
    dashboard(&admin, "newsletter").await;
    backend.clear_calls();

    let resp = get(&admin, &format!("/admin/subscriptions/{}/mail", subscription.id)).await;
    assert_eq!(location(&resp), "mailto:fan@example.com");
    assert!(backend.calls().is_empty());
}
