//! [`DataStore`] over `PostgREST`.

use mediarch_core::{
    Contact, ContactId, ContactStatus, NewContact, NewSubscription, NewsletterSubscription,
    SubscriptionId, SubscriptionStatus,
};
use serde::Serialize;
use tracing::instrument;

use super::SupabaseClient;
use crate::error::StoreError;
use crate::store::DataStore;

const CONTACTS: &str = "contacts";
const SUBSCRIPTIONS: &str = "newsletter_subscriptions";

#[derive(Serialize)]
struct ReadPatch {
    read: bool,
}

#[derive(Serialize)]
struct StatusPatch<S> {
    status: S,
}

#[async_trait::async_trait]
impl DataStore for SupabaseClient {
    #[instrument(skip(self, new), fields(email = %new.email))]
    async fn insert_subscription(&self, new: &NewSubscription) -> Result<(), StoreError> {
        self.insert_row(SUBSCRIPTIONS, new).await
    }

    #[instrument(skip(self, new), fields(email = %new.email))]
    async fn insert_contact(&self, new: &NewContact) -> Result<(), StoreError> {
        self.insert_row(CONTACTS, new).await
    }

    #[instrument(skip(self))]
    async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        self.select_newest_first(CONTACTS).await
    }

    #[instrument(skip(self))]
    async fn list_subscriptions(&self) -> Result<Vec<NewsletterSubscription>, StoreError> {
        self.select_newest_first(SUBSCRIPTIONS).await
    }

    #[instrument(skip(self), fields(contact_id = %id))]
    async fn mark_contact_read(&self, id: ContactId) -> Result<(), StoreError> {
        self.update_by_id(CONTACTS, id.as_uuid(), &ReadPatch { read: true })
            .await
    }

    #[instrument(skip(self), fields(contact_id = %id, status = %status))]
    async fn set_contact_status(
        &self,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<(), StoreError> {
        self.update_by_id(CONTACTS, id.as_uuid(), &StatusPatch { status })
            .await
    }

    #[instrument(skip(self), fields(subscription_id = %id, status = %status))]
    async fn set_subscription_status(
        &self,
        id: SubscriptionId,
        status: SubscriptionStatus,
    ) -> Result<(), StoreError> {
        self.update_by_id(SUBSCRIPTIONS, id.as_uuid(), &StatusPatch { status })
            .await
    }

    #[instrument(skip(self), fields(contact_id = %id))]
    async fn delete_contact(&self, id: ContactId) -> Result<(), StoreError> {
        self.delete_by_id(CONTACTS, id.as_uuid()).await
    }

    #[instrument(skip(self), fields(subscription_id = %id))]
    async fn delete_subscription(&self, id: SubscriptionId) -> Result<(), StoreError> {
        self.delete_by_id(SUBSCRIPTIONS, id.as_uuid()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mediarch_core::Email;
    use secrecy::SecretString;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::SupabaseConfig;

    const ANON_KEY: &str = "anon-test-key";

    async fn client_for(server: &MockServer) -> SupabaseClient {
        let config = SupabaseConfig {
            url: Url::parse(&server.uri()).unwrap(),
            anon_key: SecretString::from(ANON_KEY),
        };
        SupabaseClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_insert_subscription_asks_for_minimal_return() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/newsletter_subscriptions"))
            .and(header("apikey", ANON_KEY))
            .and(header("authorization", format!("Bearer {ANON_KEY}").as_str()))
            .and(header("prefer", "return=minimal"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let new = NewSubscription::active(Email::parse("a@b.com").unwrap());
        client.insert_subscription(&new).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_contact_asks_for_minimal_return() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/contacts"))
            .and(header("prefer", "return=minimal"))
            .and(body_json(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Hello"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let new = NewContact {
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            message: "Hello".to_string(),
        };
        client.insert_contact(&new).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_subscription_maps_to_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/newsletter_subscriptions"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "details": "Key (email)=(a@b.com) already exists.",
                "hint": null,
                "message": "duplicate key value violates unique constraint \"newsletter_subscriptions_email_key\""
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let new = NewSubscription::active(Email::parse("a@b.com").unwrap());
        let err = client.insert_subscription(&new).await.unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_list_contacts_orders_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .and(query_param("select", "*"))
            .and(query_param("order", "created_at.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "7d1f6c1e-5d8e-4d5b-9c57-0d2f4f6c9a11",
                    "name": "Ada",
                    "email": "ada@example.com",
                    "message": "Hello",
                    "created_at": "2025-03-01T12:30:00+00:00",
                    "status": null,
                    "read": false
                }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let contacts = client.list_contacts().await.unwrap();

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts.first().unwrap().status, ContactStatus::Pending);
    }

    #[tokio::test]
    async fn test_status_update_filters_by_id_with_user_token() {
        let server = MockServer::start().await;
        let id: ContactId = "7d1f6c1e-5d8e-4d5b-9c57-0d2f4f6c9a11".parse().unwrap();
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/contacts"))
            .and(query_param("id", format!("eq.{id}").as_str()))
            .and(header("authorization", "Bearer user-jwt"))
            .and(header("apikey", ANON_KEY))
            .and(body_json(json!({ "status": "rejected" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await.with_access_token("user-jwt");
        client
            .set_contact_status(id, ContactStatus::Rejected)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mark_read_sends_read_true() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/contacts"))
            .and(body_json(json!({ "read": true })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.mark_contact_read(ContactId::random()).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_surfaces_rls_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/newsletter_subscriptions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "PGRST301",
                "message": "JWT expired"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await.with_access_token("stale-jwt");
        let err = client
            .delete_subscription(SubscriptionId::random())
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Unauthorized(ref m) if m == "JWT expired"));
    }
}
