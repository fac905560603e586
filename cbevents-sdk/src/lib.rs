//! Rust SDK for the CloudBees Services Platform **Event API**.
//!
//! Publish structured events about cloud resources, query past events by
//! filter, fetch a single event by reference, and delete events.
//!
//! # Example
//!
//! ```no_run
//! use cbevents_sdk::{Event, EventApiClient, EventData, ServiceTargetBuilder};
//!
//! # async fn run() -> Result<(), cbevents_sdk::EventApiError> {
//! let client = EventApiClient::new("my-access-token")?;
//!
//! let target = ServiceTargetBuilder::new("cb-app")
//!     .account("acme")
//!     .resource_id("helloworld")
//!     .build()?;
//!
//! let event = Event::new(target, "info").with_event_data(
//!     EventData::builder("Application helloworld deployed").build(),
//! );
//!
//! let event_url = client.publish(&event).await?;
//! let stored = client.read_event(&event_url).await?;
//! assert_eq!(stored.event_type(), "info");
//! # Ok(())
//! # }
//! ```

pub mod endpoint;
pub mod error;
pub mod objects;

#[cfg(feature = "client")]
pub mod client;

pub use endpoint::ServicesEndpoint;
pub use error::EventApiError;
pub use objects::event::{Event, EventData, EventDataBuilder};
pub use objects::query::{EventQuery, QueryBuilder};
pub use objects::target::{ServiceTargetBuilder, Target};

#[cfg(feature = "client")]
pub use client::EventApiClient;
