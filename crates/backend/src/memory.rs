//! In-process backend.
//!
//! Implements [`DataStore`], [`AuthProvider`] and [`StoreProvider`] over
//! shared vectors so the surfaces can run without a Supabase project. It
//! mimics the parts of the hosted backend the surfaces rely on: the email
//! uniqueness constraint, newest-first ordering, token checks and the
//! anonymous role only being allowed to insert. Every call is logged and a
//! failure can be injected for the next call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use mediarch_core::{
    Contact, ContactId, ContactStatus, Email, EmailError, NewContact, NewSubscription,
    NewsletterSubscription, SubscriptionId, SubscriptionStatus,
};
use uuid::Uuid;

use crate::auth::{AdminIdentity, AuthProvider, AuthSession};
use crate::error::{AuthError, StoreError, UNIQUE_VIOLATION};
use crate::store::{DataStore, StoreProvider};

/// A remote call as seen by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InsertSubscription(String),
    InsertContact(String),
    ListContacts,
    ListSubscriptions,
    MarkContactRead(ContactId),
    SetContactStatus(ContactId, ContactStatus),
    SetSubscriptionStatus(SubscriptionId, SubscriptionStatus),
    DeleteContact(ContactId),
    DeleteSubscription(SubscriptionId),
    SignIn(String),
    RefreshSession,
    GetUser,
    SignOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Full access; what tests get when using the backend directly.
    Service,
    /// Public anon key: may only insert.
    Anonymous,
    /// A signed-in admin with a live token.
    Authenticated,
    /// A token the backend no longer accepts.
    Rejected,
}

#[derive(Default)]
struct State {
    contacts: Vec<Contact>,
    subscriptions: Vec<NewsletterSubscription>,
    calls: Vec<Call>,
    store_failure: Option<String>,
    auth_failure: Option<String>,
    admins: Vec<(String, String, AdminIdentity)>,
    tokens: HashMap<String, AdminIdentity>,
    /// Refresh token to the access token it was issued alongside.
    refresh_tokens: HashMap<String, (String, AdminIdentity)>,
    token_lifetime: Option<Duration>,
}

impl State {
    fn issue_session(&mut self, user: AdminIdentity) -> AuthSession {
        let access_token = format!("memory-{}", Uuid::new_v4());
        let refresh_token = format!("memory-refresh-{}", Uuid::new_v4());
        let lifetime = self.token_lifetime.unwrap_or_else(|| Duration::hours(1));

        self.tokens.insert(access_token.clone(), user.clone());
        self.refresh_tokens
            .insert(refresh_token.clone(), (access_token.clone(), user.clone()));

        AuthSession {
            access_token,
            refresh_token: Some(refresh_token),
            expires_at: Some(Utc::now() + lifetime),
            user,
        }
    }
}

/// Shared in-memory backend. Clones share state.
#[derive(Clone)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    role: Role,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MemoryBackend")
            .field("role", &self.role)
            .field("contacts", &state.contacts.len())
            .field("subscriptions", &state.subscriptions.len())
            .field("calls", &state.calls.len())
            .finish_non_exhaustive()
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            role: Role::Service,
        }
    }

    fn with_role(&self, role: Role) -> Self {
        Self {
            state: Arc::clone(&self.state),
            role,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an admin account for password sign-in.
    pub fn add_admin(&self, email: &str, password: &str) -> AdminIdentity {
        let identity = AdminIdentity {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        self.lock()
            .admins
            .push((email.to_string(), password.to_string(), identity.clone()));
        identity
    }

    /// Insert a contact directly, bypassing the call log.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if `email` is not a valid address.
    pub fn seed_contact(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<Contact, EmailError> {
        let contact = Contact {
            id: ContactId::random(),
            name: name.to_string(),
            email: Email::parse(email)?,
            message: message.to_string(),
            created_at: Utc::now(),
            status: ContactStatus::Pending,
            read: false,
        };
        self.lock().contacts.push(contact.clone());
        Ok(contact)
    }

    /// Insert a subscription directly, bypassing the call log.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if `email` is not a valid address.
    pub fn seed_subscription(
        &self,
        email: &str,
        status: SubscriptionStatus,
    ) -> Result<NewsletterSubscription, EmailError> {
        let subscription = NewsletterSubscription {
            id: SubscriptionId::random(),
            email: Email::parse(email)?,
            created_at: Utc::now(),
            status,
        };
        self.lock().subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    /// Make the next data-store call fail with `message`.
    pub fn fail_next(&self, message: &str) {
        self.lock().store_failure = Some(message.to_string());
    }

    /// Make the next auth call fail with `message`.
    pub fn fail_next_auth(&self, message: &str) {
        self.lock().auth_failure = Some(message.to_string());
    }

    /// Forget every issued token, as the auth service does when a session is
    /// revoked.
    pub fn revoke_tokens(&self) {
        let mut state = self.lock();
        state.tokens.clear();
        state.refresh_tokens.clear();
    }

    /// Lifetime stamped on sessions issued from now on. A negative value
    /// issues sessions that are already past their expiry.
    pub fn set_token_lifetime(&self, lifetime: Duration) {
        self.lock().token_lifetime = Some(lifetime);
    }

    /// Every call issued so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Stored contacts, newest first.
    #[must_use]
    pub fn contacts(&self) -> Vec<Contact> {
        newest_first(&self.lock().contacts, |c| c.created_at)
    }

    /// Stored subscriptions, newest first.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<NewsletterSubscription> {
        newest_first(&self.lock().subscriptions, |s| s.created_at)
    }

    /// Log `call`, then apply the role check and any injected failure.
    fn begin(
        &self,
        call: Call,
        write_allowed_for_anon: bool,
    ) -> Result<MutexGuard<'_, State>, StoreError> {
        let mut state = self.lock();
        state.calls.push(call);

        match self.role {
            Role::Rejected => {
                return Err(StoreError::Unauthorized("JWT expired".to_string()));
            }
            Role::Anonymous if !write_allowed_for_anon => {
                return Err(StoreError::Unauthorized(
                    "permission denied for anonymous role".to_string(),
                ));
            }
            _ => {}
        }

        if let Some(message) = state.store_failure.take() {
            return Err(StoreError::Api {
                status: 500,
                code: None,
                message,
            });
        }

        Ok(state)
    }

    fn begin_auth(&self, call: Call) -> Result<MutexGuard<'_, State>, AuthError> {
        let mut state = self.lock();
        state.calls.push(call);

        if let Some(message) = state.auth_failure.take() {
            return Err(AuthError::Api {
                status: 503,
                message,
            });
        }

        Ok(state)
    }
}

fn newest_first<T: Clone>(
    rows: &[T],
    created_at: impl Fn(&T) -> chrono::DateTime<Utc>,
) -> Vec<T> {
    // Reverse insertion order first so equal timestamps still list newest first.
    let mut rows: Vec<T> = rows.iter().rev().cloned().collect();
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows
}

#[async_trait::async_trait]
impl DataStore for MemoryBackend {
    async fn insert_subscription(&self, new: &NewSubscription) -> Result<(), StoreError> {
        let mut state = self.begin(Call::InsertSubscription(new.email.to_string()), true)?;

        if state.subscriptions.iter().any(|s| s.email == new.email) {
            return Err(StoreError::Conflict {
                message: format!(
                    "duplicate key value violates unique constraint \"newsletter_subscriptions_email_key\" ({UNIQUE_VIOLATION})"
                ),
            });
        }

        let row = NewsletterSubscription {
            id: SubscriptionId::random(),
            email: new.email.clone(),
            created_at: new.created_at,
            status: new.status,
        };
        state.subscriptions.push(row);
        Ok(())
    }

    async fn insert_contact(&self, new: &NewContact) -> Result<(), StoreError> {
        let mut state = self.begin(Call::InsertContact(new.email.to_string()), true)?;

        let row = Contact {
            id: ContactId::random(),
            name: new.name.clone(),
            email: new.email.clone(),
            message: new.message.clone(),
            created_at: Utc::now(),
            status: ContactStatus::Pending,
            read: false,
        };
        state.contacts.push(row);
        Ok(())
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        let state = self.begin(Call::ListContacts, false)?;
        Ok(newest_first(&state.contacts, |c| c.created_at))
    }

    async fn list_subscriptions(&self) -> Result<Vec<NewsletterSubscription>, StoreError> {
        let state = self.begin(Call::ListSubscriptions, false)?;
        Ok(newest_first(&state.subscriptions, |s| s.created_at))
    }

    async fn mark_contact_read(&self, id: ContactId) -> Result<(), StoreError> {
        let mut state = self.begin(Call::MarkContactRead(id), false)?;
        if let Some(contact) = state.contacts.iter_mut().find(|c| c.id == id) {
            contact.read = true;
        }
        Ok(())
    }

    async fn set_contact_status(
        &self,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.begin(Call::SetContactStatus(id, status), false)?;
        if let Some(contact) = state.contacts.iter_mut().find(|c| c.id == id) {
            contact.status = status;
        }
        Ok(())
    }

    async fn set_subscription_status(
        &self,
        id: SubscriptionId,
        status: SubscriptionStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.begin(Call::SetSubscriptionStatus(id, status), false)?;
        if let Some(subscription) = state.subscriptions.iter_mut().find(|s| s.id == id) {
            subscription.status = status;
        }
        Ok(())
    }

    async fn delete_contact(&self, id: ContactId) -> Result<(), StoreError> {
        let mut state = self.begin(Call::DeleteContact(id), false)?;
        state.contacts.retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_subscription(&self, id: SubscriptionId) -> Result<(), StoreError> {
        let mut state = self.begin(Call::DeleteSubscription(id), false)?;
        state.subscriptions.retain(|s| s.id != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let mut state = self.begin_auth(Call::SignIn(email.to_string()))?;

        let user = state
            .admins
            .iter()
            .find(|(e, p, _)| e.eq_ignore_ascii_case(email) && p == password)
            .map(|(_, _, identity)| identity.clone())
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(state.issue_session(user))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let mut state = self.begin_auth(Call::RefreshSession)?;

        // Refresh tokens are single use; the access token they came with is retired.
        let (old_access, user) = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AuthError::SessionExpired("Invalid Refresh Token".to_string()))?;
        state.tokens.remove(&old_access);

        Ok(state.issue_session(user))
    }

    async fn get_user(&self, access_token: &str) -> Result<AdminIdentity, AuthError> {
        let state = self.begin_auth(Call::GetUser)?;
        state
            .tokens
            .get(access_token)
            .cloned()
            .ok_or_else(|| AuthError::SessionExpired("invalid JWT".to_string()))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let mut state = self.begin_auth(Call::SignOut)?;
        state.tokens.remove(access_token);
        state
            .refresh_tokens
            .retain(|_, (access, _)| access != access_token);
        Ok(())
    }
}

impl StoreProvider for MemoryBackend {
    fn anonymous(&self) -> Arc<dyn DataStore> {
        Arc::new(self.with_role(Role::Anonymous))
    }

    fn for_session(&self, session: &AuthSession) -> Arc<dyn DataStore> {
        let live = self.lock().tokens.contains_key(&session.access_token);
        let role = if live {
            Role::Authenticated
        } else {
            Role::Rejected
        };
        Arc::new(self.with_role(role))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_insert_leaves_one_row() {
        let backend = MemoryBackend::new();
        let new = NewSubscription::active(Email::parse("a@b.com").unwrap());

        backend.insert_subscription(&new).await.unwrap();
        assert_eq!(backend.subscriptions()[0].status, SubscriptionStatus::Active);

        let err = backend.insert_subscription(&new).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(backend.subscriptions().len(), 1);
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let backend = MemoryBackend::new();
        let first = backend.seed_contact("Ada", "ada@example.com", "first").unwrap();
        let second = backend
            .seed_contact("Grace", "grace@example.com", "second")
            .unwrap();

        let contacts = backend.list_contacts().await.unwrap();
        let ids: Vec<_> = contacts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_anonymous_role_may_only_insert() {
        let backend = MemoryBackend::new();
        let anon = backend.anonymous();

        let new = NewSubscription::active(Email::parse("fan@example.com").unwrap());
        assert!(anon.insert_subscription(&new).await.is_ok());
        assert!(matches!(
            anon.list_subscriptions().await,
            Err(StoreError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected_by_store() {
        let backend = MemoryBackend::new();
        backend.add_admin("admin@mediarch.test", "hunter22");
        let session = backend
            .sign_in_with_password("admin@mediarch.test", "hunter22")
            .await
            .unwrap();

        assert!(backend.for_session(&session).list_contacts().await.is_ok());

        backend.sign_out(&session.access_token).await.unwrap();
        assert!(matches!(
            backend.for_session(&session).list_contacts().await,
            Err(StoreError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let backend = MemoryBackend::new();
        backend.add_admin("admin@mediarch.test", "hunter22");
        let first = backend
            .sign_in_with_password("admin@mediarch.test", "hunter22")
            .await
            .unwrap();
        let refresh = first.refresh_token.clone().unwrap();

        let second = backend.refresh_session(&refresh).await.unwrap();
        assert_ne!(second.access_token, first.access_token);
        assert_eq!(second.user, first.user);
        assert!(backend.get_user(&second.access_token).await.is_ok());
        assert!(backend.get_user(&first.access_token).await.is_err());

        // Spent refresh tokens are refused.
        assert!(matches!(
            backend.refresh_session(&refresh).await,
            Err(AuthError::SessionExpired(_))
        ));
    }

    #[tokio::test]
    async fn test_negative_lifetime_issues_expired_sessions() {
        let backend = MemoryBackend::new();
        backend.add_admin("admin@mediarch.test", "hunter22");
        backend.set_token_lifetime(Duration::seconds(-1));

        let session = backend
            .sign_in_with_password("admin@mediarch.test", "hunter22")
            .await
            .unwrap();
        assert!(session.is_expired_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_injected_failure_hits_next_call_only() {
        let backend = MemoryBackend::new();
        backend.fail_next("boom");

        let err = backend.list_contacts().await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(backend.list_contacts().await.is_ok());
        assert_eq!(backend.calls(), vec![Call::ListContacts, Call::ListContacts]);
    }
}
