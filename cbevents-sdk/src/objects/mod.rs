//! Request and response types for the Event API.

pub mod event;
pub mod query;
pub mod target;
