//! Admin authentication.
//!
//! [`AuthProvider`] is the remote auth service. [`AuthContext`] is the
//! per-request state object the admin surface injects into its handlers: it
//! wraps whatever session was stored in the HTTP session and exposes the
//! `initialize` / `sign_in` / `sign_out` lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::AuthError;

/// The authenticated user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Tokens for a signed-in user.
///
/// Implements `Debug` manually to redact the tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AdminIdentity,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

impl AuthSession {
    /// Whether the access token is past its expiry.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Remote authentication service.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange an email/password pair for a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError>;

    /// Trade a refresh token for a fresh session. The refresh token is
    /// spent either way.
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    /// Look up the user owning `access_token`.
    async fn get_user(&self, access_token: &str) -> Result<AdminIdentity, AuthError>;

    /// Revoke `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}

/// Authentication state for one admin request.
pub struct AuthContext {
    provider: Arc<dyn AuthProvider>,
    session: Option<AuthSession>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    /// Wrap a previously stored session (if any). No remote call is made.
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>, stored: Option<AuthSession>) -> Self {
        Self {
            provider,
            session: stored,
        }
    }

    /// Check the stored session with the auth service.
    ///
    /// An expired session is refreshed when it carries a refresh token. A
    /// rejected session, or an expired one that cannot be refreshed, is
    /// dropped. Returns whether a valid session remains.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        if session.is_expired_at(Utc::now()) {
            let Some(refresh_token) = session.refresh_token.take() else {
                info!(user_id = %session.user.id, "Stored session expired");
                self.session = None;
                return false;
            };

            return match self.provider.refresh_session(&refresh_token).await {
                Ok(refreshed) => {
                    info!(user_id = %refreshed.user.id, "Expired session refreshed");
                    self.session = Some(refreshed);
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Session refresh failed");
                    self.session = None;
                    false
                }
            };
        }

        match self.provider.get_user(&session.access_token).await {
            Ok(user) => {
                session.user = user;
                true
            }
            Err(e) => {
                warn!(error = %e, "Stored session rejected by auth service");
                self.session = None;
                false
            }
        }
    }

    /// Sign in with email and password, replacing any current session.
    ///
    /// # Errors
    ///
    /// Returns the auth service's error; the current session is left
    /// untouched in that case.
    #[instrument(skip(self, email, password), fields(email = %email.trim()))]
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<&AuthSession, AuthError> {
        let session = self
            .provider
            .sign_in_with_password(email.trim(), password)
            .await?;
        info!(user_id = %session.user.id, "Admin signed in");
        Ok(&*self.session.insert(session))
    }

    /// Sign out remotely and clear local state.
    ///
    /// Local state is cleared even when the remote call fails, so the caller
    /// can always leave protected pages.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after clearing local state.
    #[instrument(skip(self))]
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };

        match self.provider.sign_out(&session.access_token).await {
            Ok(()) => {
                info!(user_id = %session.user.id, "Admin signed out");
                Ok(())
            }
            Err(e) => {
                warn!(user_id = %session.user.id, error = %e, "Remote sign-out failed");
                Err(e)
            }
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }
}
