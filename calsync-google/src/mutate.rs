//! Pushes local event changes to Google.

use calsync_core::Event;
use serde_json::Value;
use tracing::debug;

use crate::client::GoogleClient;
use crate::convert::{ToGoogle, item_id};
use crate::error::GoogleResult;

/// Creates, updates and deletes single events.
///
/// Each call is one request; a 401 is refreshed and retried the same way
/// list fetches are, any other failure is returned as is.
pub struct RemoteMutator {
    client: GoogleClient,
}

impl RemoteMutator {
    pub fn new(client: GoogleClient) -> Self {
        RemoteMutator { client }
    }

    /// Create an event on Google Calendar and return the id Google assigned.
    pub async fn create(&self, calendar_uid: &str, event: &Event) -> GoogleResult<String> {
        let url = self.client.url(&["calendars", calendar_uid, "events"])?;
        let body = event.to_google();

        debug!(calendar = calendar_uid, title = %event, "Creating event");

        let mut token = self.client.access_token().await?;
        let response = self
            .client
            .send_with_token(&mut token, |http| http.post(url.clone()).json(&body))
            .await?;

        let created: Value = serde_json::from_str(&response.text().await?)?;
        item_id(&created)
    }

    /// Replace an existing event (`event.uid`) with the local version.
    pub async fn update(&self, calendar_uid: &str, event: &Event) -> GoogleResult<()> {
        let url = self
            .client
            .url(&["calendars", calendar_uid, "events", &event.uid])?;
        let body = event.to_google();

        debug!(calendar = calendar_uid, event = %event.uid, "Updating event");

        let mut token = self.client.access_token().await?;
        self.client
            .send_with_token(&mut token, |http| http.put(url.clone()).json(&body))
            .await?;

        Ok(())
    }

    pub async fn delete(&self, calendar_uid: &str, event_uid: &str) -> GoogleResult<()> {
        let url = self
            .client
            .url(&["calendars", calendar_uid, "events", event_uid])?;

        debug!(calendar = calendar_uid, event = event_uid, "Deleting event");

        let mut token = self.client.access_token().await?;
        self.client
            .send_with_token(&mut token, |http| http.delete(url.clone()))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GoogleError;
    use crate::testing::{FakeTokens, client_for};
    use calsync_core::EventSource;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn event() -> Event {
        Event {
            uid: "evt/1".to_string(),
            raw_data: String::new(),
            title: "Lunch".to_string(),
            description: Some("Tacos".to_string()),
            location: None,
            busy: false,
            start: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap(),
            all_day: false,
            owner: String::new(),
            read_only: false,
            participants: vec![],
            source: EventSource::Local,
        }
    }

    #[tokio::test]
    async fn test_create_posts_body_and_returns_remote_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header("Authorization", "Bearer initial-token"))
            .and(body_partial_json(json!({
                "summary": "Lunch",
                "description": "Tacos",
                "transparency": "transparent",
                "start": {"dateTime": "2024-03-01T12:00:00Z", "timeZone": "UTC"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "abc123google",
                "summary": "Lunch"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mutator = RemoteMutator::new(client_for(&server, FakeTokens::new()));
        let id = mutator.create("primary", &event()).await.unwrap();
        assert_eq!(id, "abc123google");
    }

    #[tokio::test]
    async fn test_update_puts_to_encoded_event_path() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/calendars/primary/events/evt%2F1"))
            .and(body_partial_json(json!({"summary": "Lunch"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "evt/1"})))
            .expect(1)
            .mount(&server)
            .await;

        let mutator = RemoteMutator::new(client_for(&server, FakeTokens::new()));
        mutator.update("primary", &event()).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_sends_delete() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/me@example.com/events/evt-9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mutator = RemoteMutator::new(client_for(&server, FakeTokens::new()));
        mutator.delete("me@example.com", "evt-9").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_failure_is_returned() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(1)
            .mount(&server)
            .await;

        let mutator = RemoteMutator::new(client_for(&server, FakeTokens::new()));
        let err = mutator.delete("primary", "missing").await.unwrap_err();
        assert!(matches!(err, GoogleError::Http { status, .. } if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn test_mutations_refresh_token_on_401() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/evt-9"))
            .and(header("Authorization", "Bearer initial-token"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/evt-9"))
            .and(header("Authorization", "Bearer fresh-token-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = FakeTokens::new();
        let mutator = RemoteMutator::new(client_for(&server, tokens.clone()));
        mutator.delete("primary", "evt-9").await.unwrap();
        assert_eq!(tokens.fresh_calls(), 1);
    }
}
