//! Event resource implementation.
//!
//! Events record activity on services and other resources (deploys,
//! builds, restarts, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::RenderError;
use crate::rest::resource::{path_segment, Resource};

/// An activity event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// The unique identifier (e.g., `evt-abc123`).
    pub id: String,
    /// The event type (e.g., `deploy_started`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// The resource the event is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// The kind of that resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Event-specific details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Client for the `/events` endpoint.
#[derive(Clone, Debug)]
pub struct EventsResource {
    base: Resource,
}

impl EventsResource {
    /// Creates the resource over a shared transport.
    #[must_use]
    pub const fn new(base: Resource) -> Self {
        Self { base }
    }

    /// Retrieves an event by id.
    ///
    /// # Errors
    ///
    /// Returns a transport or `Validation` error.
    pub async fn retrieve(&self, event_id: &str) -> Result<Event, RenderError> {
        let path = format!("/events/{}", path_segment(event_id));
        let response = self.base.http().get(&path, &[]).await?;
        Resource::parse(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_deserializes_type_and_details() {
        let event: Event = serde_json::from_value(json!({
            "id": "evt-1",
            "type": "deploy_ended",
            "resourceId": "srv-1",
            "timestamp": "2024-03-01T12:00:00Z",
            "details": {"status": "succeeded"}
        }))
        .unwrap();

        assert_eq!(event.event_type, "deploy_ended");
        assert_eq!(event.resource_id.as_deref(), Some("srv-1"));
        assert!(event.resource_type.is_none());
        assert_eq!(event.details.unwrap()["status"], "succeeded");
    }

    #[test]
    fn test_event_details_must_be_object() {
        let result = serde_json::from_value::<Event>(json!({
            "id": "evt-1",
            "type": "deploy_ended",
            "timestamp": "2024-03-01T12:00:00Z",
            "details": [1, 2]
        }));
        assert!(result.is_err());
    }
}
