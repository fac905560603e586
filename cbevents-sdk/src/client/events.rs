//! Typed client for the Event API endpoints.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue, LOCATION};
use reqwest::{Client, Request, StatusCode};
use tracing::{debug, error};
use url::Url;

use crate::endpoint::ServicesEndpoint;
use crate::error::EventApiError;
use crate::objects::event::Event;

/// Path of the event collection under a Services Platform base.
const EVENT_API_PATH: &str = "api/events/";

/// Typed HTTP client for the CloudBees **Event API**.
///
/// Publishes, reads, queries and deletes events related to a Services
/// Platform subscription or resource, or to an arbitrary cloud resource.
///
/// Requires an OAuth access token with the following scopes:
///
/// - `https://api.cloudbees.com/services/api/events/read` – reading and
///   querying events
/// - `https://api.cloudbees.com/services/api/events/write` – publishing
///   events
///
/// Every request carries `Authorization: Bearer <base64(token)>`; a
/// header already present on the request (for example from a custom
/// `reqwest::Client` with default headers) is left untouched. The client
/// holds no per-call state and can be shared freely across tasks. Failed
/// calls do not poison the client.
#[derive(Debug, Clone)]
pub struct EventApiClient {
    http: Client,
    access_token: String,
    event_api_url: Url,
}

impl EventApiClient {
    /// Create a client against the production endpoint.
    pub fn new(access_token: impl Into<String>) -> Result<Self, EventApiError> {
        Self::with_endpoint(access_token, &ServicesEndpoint::production())
    }

    /// Create a client against a specific endpoint, for example
    /// [`ServicesEndpoint::development`].
    pub fn with_endpoint(
        access_token: impl Into<String>,
        endpoint: &ServicesEndpoint,
    ) -> Result<Self, EventApiError> {
        Ok(Self {
            http: Client::new(),
            access_token: access_token.into(),
            event_api_url: endpoint.join(EVENT_API_PATH)?,
        })
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// URL of the event collection this client talks to.
    pub fn event_api_url(&self) -> &Url {
        &self.event_api_url
    }

    /// Publish an event.
    ///
    /// The event must carry payload data with a title; this is checked
    /// locally before any network call. Returns the `Location` header of
    /// the newly created event; a GET on it yields the stored event.
    pub async fn publish(&self, event: &Event) -> Result<String, EventApiError> {
        let Some(event_data) = event.event_data() else {
            return Err(EventApiError::Validation(
                "no event data to be sent; set event data before publishing".into(),
            ));
        };
        if event_data.title().is_empty() {
            return Err(EventApiError::Validation(
                "'title' must be set in the event data".into(),
            ));
        }

        debug!("POST {}", self.event_api_url);
        let request = self
            .http
            .post(self.event_api_url.clone())
            .json(event)
            .build()?;
        let response = error_for_status("publish", self.dispatch(request).await?).await?;

        let location = response
            .headers()
            .get(LOCATION)
            .ok_or(EventApiError::MissingLocation)?;
        let location = location
            .to_str()
            .map_err(|_| EventApiError::MissingLocation)?;
        Ok(location.to_owned())
    }

    /// Read a single event given its URL, as returned by
    /// [`publish`](Self::publish).
    pub async fn read_event(&self, event_url: &str) -> Result<Event, EventApiError> {
        debug!("GET {event_url}");
        let request = self
            .http
            .get(event_url)
            .header(ACCEPT, "application/json")
            .build()?;
        parse_response("read_event", self.dispatch(request).await?).await
    }

    /// List events matching a query URL, typically rendered by
    /// [`QueryBuilder`](crate::objects::query::QueryBuilder).
    ///
    /// Events are returned in server order.
    pub async fn query(&self, query_url: &str) -> Result<Vec<Event>, EventApiError> {
        debug!("GET {query_url}");
        let request = self
            .http
            .get(query_url)
            .header(ACCEPT, "application/json")
            .build()?;
        parse_response("query", self.dispatch(request).await?).await
    }

    /// Delete an event.
    ///
    /// Returns `true` only when the server answered with status 200
    /// exactly; other success codes (e.g. 204) return `false` without an
    /// error.
    pub async fn delete(&self, event_url: &str) -> Result<bool, EventApiError> {
        debug!("DELETE {event_url}");
        let request = self.http.delete(event_url).build()?;
        let response = error_for_status("delete", self.dispatch(request).await?).await?;
        Ok(response.status() == StatusCode::OK)
    }

    /// Attach the bearer authorization header unless one is already set,
    /// then execute the request.
    async fn dispatch(&self, mut request: Request) -> Result<reqwest::Response, EventApiError> {
        if !request.headers().contains_key(AUTHORIZATION) {
            let header = HeaderValue::from_str(&bearer_authorization(&self.access_token))
                .map_err(|e| {
                    EventApiError::Validation(format!("access token is not a valid header: {e}"))
                })?;
            request.headers_mut().insert(AUTHORIZATION, header);
        }
        Ok(self.http.execute(request).await?)
    }
}

/// Format the `Authorization` header value: `Bearer <base64(token)>`.
fn bearer_authorization(access_token: &str) -> String {
    format!(
        "Bearer {}",
        fast32::base64::RFC4648.encode(access_token.as_bytes())
    )
}

async fn error_for_status(
    operation: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, EventApiError> {
    let status = response.status();
    if status.as_u16() >= 300 {
        let body = response.text().await.unwrap_or_default();
        error!("{operation} returned HTTP status {status}: {body}");
        return Err(EventApiError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    operation: &str,
    response: reqwest::Response,
) -> Result<T, EventApiError> {
    let response = error_for_status(operation, response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(EventApiError::Json)
}
