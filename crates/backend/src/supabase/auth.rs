//! [`AuthProvider`] over `GoTrue`.

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use super::SupabaseClient;
use crate::auth::{AdminIdentity, AuthProvider, AuthSession};
use crate::error::AuthError;

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: UserResponse,
}

#[derive(Deserialize)]
struct UserResponse {
    id: Uuid,
    email: Option<String>,
}

impl From<UserResponse> for AdminIdentity {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> AuthSession {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));

        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

impl SupabaseClient {
    fn auth_url(&self, path: &str) -> Result<Url, AuthError> {
        self.inner
            .auth_url
            .join(path)
            .map_err(|e| AuthError::Parse(format!("Invalid auth URL: {e}")))
    }

    /// `POST /auth/v1/token?grant_type=...`.
    ///
    /// Token grants always go out with the anon key, never a stale user token.
    async fn token_grant<B: Serialize + Sync>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<AuthSession, AuthError> {
        let mut url = self.auth_url("token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(self.inner.anon_key.expose_secret())
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(auth_error(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(format!("Failed to parse token response: {e}")))?;
        Ok(token.into_session(Utc::now()))
    }
}

async fn auth_error(response: reqwest::Response) -> AuthError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AuthError::from_response(status, &body)
}

#[async_trait::async_trait]
impl AuthProvider for SupabaseClient {
    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        self.token_grant("password", &PasswordGrant { email, password })
            .await
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        self.token_grant("refresh_token", &RefreshGrant { refresh_token })
            .await
    }

    #[instrument(skip(self, access_token))]
    async fn get_user(&self, access_token: &str) -> Result<AdminIdentity, AuthError> {
        let response = self
            .inner
            .client
            .get(self.auth_url("user")?)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(auth_error(response).await);
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(format!("Failed to parse user response: {e}")))?;
        Ok(user.into())
    }

    #[instrument(skip(self, access_token))]
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .inner
            .client
            .post(self.auth_url("logout")?)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        // Token already gone server-side; nothing left to revoke.
        if matches!(status.as_u16(), 401 | 403 | 404) {
            debug!(status = status.as_u16(), "Session already invalid at sign-out");
            return Ok(());
        }

        Err(auth_error(response).await)
    }
}
