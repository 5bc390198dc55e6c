//! Supabase client for the `contacts` and `newsletter_subscriptions` tables
//! and for admin authentication.
//!
//! # API Reference
//!
//! - Rows: `PostgREST` under `{SUPABASE_URL}/rest/v1/{table}`
//! - Auth: `GoTrue` under `{SUPABASE_URL}/auth/v1`
//! - Every request carries `apikey: <anon key>` and
//!   `Authorization: Bearer <access token or anon key>`
//!
//! A client built from config acts as the anonymous role. Use
//! [`SupabaseClient::with_access_token`] (or [`StoreProvider::for_session`])
//! to act as a signed-in admin so row-level security sees the admin's JWT.

mod auth;
mod rest;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::config::SupabaseConfig;
use crate::error::StoreError;
use crate::store::{DataStore, StoreProvider};

const REST_PATH: &str = "rest/v1/";
const AUTH_PATH: &str = "auth/v1/";

/// Supabase REST + auth client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
    access_token: Option<Arc<SecretString>>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    rest_url: Url,
    auth_url: Url,
    anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("rest_url", &self.inner.rest_url.as_str())
            .field("auth_url", &self.inner.auth_url.as_str())
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Create a client acting as the anonymous role.
    ///
    /// # Errors
    ///
    /// Returns error if the anon key is not a valid header value, the project
    /// URL cannot be a base URL, or the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(config.anon_key.expose_secret())
            .map_err(|e| StoreError::Parse(format!("Invalid anon key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                rest_url: service_root(&config.url, REST_PATH)?,
                auth_url: service_root(&config.url, AUTH_PATH)?,
                anon_key: config.anon_key.clone(),
            }),
            access_token: None,
        })
    }

    /// A handle that authenticates as the owner of `access_token`.
    #[must_use]
    pub fn with_access_token(&self, access_token: &str) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            access_token: Some(Arc::new(SecretString::from(access_token.to_string()))),
        }
    }

    /// Bearer token for row requests: the user's JWT, else the anon key.
    fn bearer(&self) -> &str {
        self.access_token
            .as_deref()
            .unwrap_or(&self.inner.anon_key)
            .expose_secret()
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        self.inner
            .rest_url
            .join(table)
            .map_err(|e| StoreError::Parse(format!("Invalid table URL: {e}")))
    }

    /// `GET /rest/v1/{table}?select=*&order=created_at.desc`
    pub(crate) async fn select_newest_first<T: DeserializeOwned>(
        &self,
        table: &str,
    ) -> Result<Vec<T>, StoreError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(self.bearer())
            .send()
            .await?;
        handle_json(response).await
    }

    /// `POST /rest/v1/{table}` with `return=minimal`.
    ///
    /// Asking for the row back would need a SELECT policy the anonymous role
    /// does not have.
    pub(crate) async fn insert_row<B: Serialize + Sync>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<(), StoreError> {
        let url = self.table_url(table)?;
        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(self.bearer())
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        handle_empty(response).await
    }

    /// `PATCH /rest/v1/{table}?id=eq.{id}`
    pub(crate) async fn update_by_id<B: Serialize + Sync>(
        &self,
        table: &str,
        id: Uuid,
        body: &B,
    ) -> Result<(), StoreError> {
        let url = self.row_url(table, id)?;
        let response = self
            .inner
            .client
            .patch(url)
            .bearer_auth(self.bearer())
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        handle_empty(response).await
    }

    /// `DELETE /rest/v1/{table}?id=eq.{id}`
    pub(crate) async fn delete_by_id(&self, table: &str, id: Uuid) -> Result<(), StoreError> {
        let url = self.row_url(table, id)?;
        let response = self
            .inner
            .client
            .delete(url)
            .bearer_auth(self.bearer())
            .send()
            .await?;
        handle_empty(response).await
    }

    fn row_url(&self, table: &str, id: Uuid) -> Result<Url, StoreError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }
}

impl StoreProvider for SupabaseClient {
    fn anonymous(&self) -> Arc<dyn DataStore> {
        Arc::new(Self {
            inner: Arc::clone(&self.inner),
            access_token: None,
        })
    }

    fn for_session(&self, session: &AuthSession) -> Arc<dyn DataStore> {
        Arc::new(self.with_access_token(&session.access_token))
    }
}

/// Resolve `{base}/{service}` keeping any path prefix on `base`.
fn service_root(base: &Url, service: &str) -> Result<Url, StoreError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(service)
        .map_err(|e| StoreError::Parse(format!("Invalid Supabase URL: {e}")))
}

async fn handle_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| StoreError::Parse(format!("Failed to parse response: {e}")));
    }
    Err(parse_error(response).await)
}

async fn handle_empty(response: reqwest::Response) -> Result<(), StoreError> {
    if response.status().is_success() {
        return Ok(());
    }
    Err(parse_error(response).await)
}

async fn parse_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::from_response(status, &body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_service_root_without_trailing_slash() {
        let base = Url::parse("https://abcd.supabase.co").unwrap();
        assert_eq!(
            service_root(&base, REST_PATH).unwrap().as_str(),
            "https://abcd.supabase.co/rest/v1/"
        );
    }

    #[test]
    fn test_service_root_keeps_path_prefix() {
        let base = Url::parse("http://127.0.0.1:54321/proxy").unwrap();
        assert_eq!(
            service_root(&base, AUTH_PATH).unwrap().as_str(),
            "http://127.0.0.1:54321/proxy/auth/v1/"
        );
    }

    #[test]
    fn test_debug_hides_tokens() {
        let config = SupabaseConfig {
            url: Url::parse("https://abcd.supabase.co").unwrap(),
            anon_key: SecretString::from("anon-key-value"),
        };
        let client = SupabaseClient::new(&config)
            .unwrap()
            .with_access_token("user-jwt-value");

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("authenticated: true"));
        assert!(!debug_output.contains("anon-key-value"));
        assert!(!debug_output.contains("user-jwt-value"));
    }
}
