//! Event records and their payload data.

use serde::{Deserialize, Serialize};
use url::Url;

use super::target::Target;

/// A record describing something that happened to a [`Target`].
///
/// The target and the type tag are fixed at construction; payload data,
/// an optional source target and the activation window are attached
/// afterwards with the `with_*` methods. The `id` is assigned by the
/// server and is only present on events decoded from a response.
///
/// Timestamps are epoch milliseconds, matching the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<Target>,
    #[serde(rename = "event", skip_serializing_if = "Option::is_none")]
    event_data: Option<EventData>,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiry_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    activation_time: Option<i64>,
}

impl Event {
    /// Create an event about `target` with the given type tag (for
    /// example `info` or `alert`).
    pub fn new(target: Target, event_type: impl Into<String>) -> Self {
        Self {
            id: None,
            target,
            source: None,
            event_data: None,
            event_type: event_type.into(),
            expiry_time: None,
            activation_time: None,
        }
    }

    /// Attach payload data. Required before publishing.
    pub fn with_event_data(mut self, event_data: EventData) -> Self {
        self.event_data = Some(event_data);
        self
    }

    /// Attach a secondary target describing where the event originated.
    pub fn with_source(mut self, source: Target) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the expiry time, in epoch milliseconds.
    pub fn with_expiry_time(mut self, expiry_time: i64) -> Self {
        self.expiry_time = Some(expiry_time);
        self
    }

    /// Set the activation time, in epoch milliseconds.
    pub fn with_activation_time(mut self, activation_time: i64) -> Self {
        self.activation_time = Some(activation_time);
        self
    }

    /// Server-assigned identifier; `None` until the event has been
    /// decoded from a read or query response.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn source(&self) -> Option<&Target> {
        self.source.as_ref()
    }

    pub fn event_data(&self) -> Option<&EventData> {
        self.event_data.as_ref()
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn expiry_time(&self) -> Option<i64> {
        self.expiry_time
    }

    pub fn activation_time(&self) -> Option<i64> {
        self.activation_time
    }
}

/// Payload data of an event.
///
/// There are four well-known elements:
///
/// - `title` – required, e.g. "Application helloworld deployed"
/// - `description` – optional free text
/// - `icon` – optional URL of an icon related to the event
/// - `url` – optional URL where more details can be found
///
/// Unknown keys sent by newer servers are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<Url>,
}

impl EventData {
    /// Start building payload data with the required title.
    pub fn builder(title: impl Into<String>) -> EventDataBuilder {
        EventDataBuilder {
            data: EventData {
                title: title.into(),
                description: None,
                icon: None,
                url: None,
            },
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn icon(&self) -> Option<&Url> {
        self.icon.as_ref()
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }
}

/// Builder for [`EventData`]. The title is supplied up front; everything
/// else is optional.
#[derive(Debug, Clone)]
pub struct EventDataBuilder {
    data: EventData,
}

impl EventDataBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.data.description = Some(description.into());
        self
    }

    pub fn icon(mut self, icon: Url) -> Self {
        self.data.icon = Some(icon);
        self
    }

    pub fn url(mut self, url: Url) -> Self {
        self.data.url = Some(url);
        self
    }

    pub fn build(self) -> EventData {
        self.data
    }
}
