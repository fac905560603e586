//! HTTP client for the Event API.
//!
//! Gated behind the `client` cargo feature (on by default) so downstream
//! crates that only need the shared types can drop `reqwest`.

mod events;

pub use events::EventApiClient;
