//! Error type shared by every Event API operation.

/// Errors produced by the Event API SDK.
#[derive(Debug, thiserror::Error)]
pub enum EventApiError {
    /// A local precondition failed before any network call was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// A derived URL is not well-formed.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a status code of 300 or above.
    #[error("api error: status {status}, body: {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[cfg(feature = "client")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The publish response did not carry a usable `Location` header.
    #[error("publish response missing Location header")]
    MissingLocation,
}
