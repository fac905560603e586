//! Query construction for the event listing endpoint.

use time::OffsetDateTime;
use url::Url;

use crate::error::EventApiError;

/// Name of the query parameter carrying the comma-joined type list.
pub const TYPES_PARAM: &str = "types";

/// An immutable, fully rendered event query.
///
/// Produced by [`QueryBuilder::build`]; feed [`as_str`](Self::as_str)
/// to `EventApiClient::query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    query_url: Url,
}

impl EventQuery {
    /// The rendered query URL.
    pub fn as_str(&self) -> &str {
        self.query_url.as_str()
    }

    /// Consume the query, returning the underlying [`Url`].
    pub fn into_url(self) -> Url {
        self.query_url
    }
}

impl std::fmt::Display for EventQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.query_url.as_str())
    }
}

/// Two-phase builder for event queries.
///
/// Setters only accumulate; validation and URL rendering happen in
/// [`build`](Self::build). Filtering by `resource` requires both
/// `service` and `account`. When `cloud_resource` is set the server
/// treats it as the primary discriminator and the
/// service/account/resource triple is advisory only.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base: String,
    account: Option<String>,
    service: Option<String>,
    resource: Option<String>,
    cloud_resource: Option<String>,
    cloud_resource_type: Option<String>,
    from: Option<OffsetDateTime>,
    to: Option<OffsetDateTime>,
    types: Vec<String>,
    limit: u32,
    offset: u32,
}

impl QueryBuilder {
    /// Start a query against the given event listing endpoint.
    pub fn new(event_uri: impl Into<String>) -> Self {
        Self {
            base: event_uri.into(),
            account: None,
            service: None,
            resource: None,
            cloud_resource: None,
            cloud_resource_type: None,
            from: None,
            to: None,
            types: Vec::new(),
            limit: 0,
            offset: 0,
        }
    }

    /// Account (domain) name.
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Service name, for example `dev-at-cloud` or `cb-app`.
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Resource identifier; requires `service` and `account` at build
    /// time.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Cloud resource URL. When set, the server ignores the
    /// service/account/resource filters.
    pub fn cloud_resource(mut self, cloud_resource: impl Into<String>) -> Self {
        self.cloud_resource = Some(cloud_resource.into());
        self
    }

    /// Cloud resource type tag.
    pub fn cloud_resource_type(mut self, cloud_resource_type: impl Into<String>) -> Self {
        self.cloud_resource_type = Some(cloud_resource_type.into());
        self
    }

    /// Lower bound of the time range, sent as epoch milliseconds.
    pub fn from(mut self, from: OffsetDateTime) -> Self {
        self.from = Some(from);
        self
    }

    /// Upper bound of the time range, sent as epoch milliseconds.
    pub fn to(mut self, to: OffsetDateTime) -> Self {
        self.to = Some(to);
        self
    }

    /// Event types to match, for example `info` or `alert`.
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Maximum number of events to return; 0 leaves the server default.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Number of events to skip; 0 is omitted from the URL.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Validate the accumulated filters and render the query URL.
    pub fn build(self) -> Result<EventQuery, EventApiError> {
        if let Some(resource) = &self.resource {
            if self.service.is_none() {
                return Err(EventApiError::Validation(format!(
                    "service must be set with resource: {resource}"
                )));
            }
            if self.account.is_none() {
                return Err(EventApiError::Validation(format!(
                    "account must be set with resource: {resource}"
                )));
            }
        }

        let mut query_url = Url::parse(&self.base)?;
        {
            let mut pairs = query_url.query_pairs_mut();
            if let Some(account) = &self.account {
                pairs.append_pair("account", account);
            }
            if let Some(service) = &self.service {
                pairs.append_pair("service", service);
            }
            if let Some(resource) = &self.resource {
                pairs.append_pair("resource", resource);
            }
            if let Some(from) = self.from {
                pairs.append_pair("from", &epoch_millis(from).to_string());
            }
            if let Some(to) = self.to {
                pairs.append_pair("to", &epoch_millis(to).to_string());
            }
            if self.limit > 0 {
                pairs.append_pair("limit", &self.limit.to_string());
            }
            if self.offset > 0 {
                pairs.append_pair("offset", &self.offset.to_string());
            }
            if let Some(cloud_resource) = &self.cloud_resource {
                pairs.append_pair("cloud_resource", cloud_resource);
            }
            if let Some(cloud_resource_type) = &self.cloud_resource_type {
                pairs.append_pair("cloud_resource_type", cloud_resource_type);
            }
            if !self.types.is_empty() {
                pairs.append_pair(TYPES_PARAM, &self.types.join(","));
            }
        }

        Ok(EventQuery { query_url })
    }
}

fn epoch_millis(timestamp: OffsetDateTime) -> i64 {
    (timestamp.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://services-platform.cloudbees.com/api/events/";

    #[test]
    fn all_set_fields_appear_as_parameters() {
        let query = QueryBuilder::new(BASE)
            .service("s")
            .account("a")
            .resource("r")
            .limit(10)
            .offset(5)
            .build()
            .unwrap();
        for pair in ["service=s", "account=a", "resource=r", "limit=10", "offset=5"] {
            assert!(query.as_str().contains(pair), "missing {pair} in {query}");
        }
    }

    #[test]
    fn zero_limit_and_offset_are_omitted() {
        let query = QueryBuilder::new(BASE)
            .account("a")
            .limit(0)
            .offset(0)
            .build()
            .unwrap();
        assert!(!query.as_str().contains("limit"));
        assert!(!query.as_str().contains("offset"));
    }

    #[test]
    fn resource_without_service_fails() {
        let err = QueryBuilder::new(BASE).resource("r").build().unwrap_err();
        assert!(matches!(err, EventApiError::Validation(_)));
    }

    #[test]
    fn resource_without_account_fails() {
        let err = QueryBuilder::new(BASE)
            .service("s")
            .resource("r")
            .build()
            .unwrap_err();
        assert!(matches!(err, EventApiError::Validation(_)));
    }

    #[test]
    fn types_are_joined_with_commas() {
        let query = QueryBuilder::new(BASE)
            .types(["info", "alert"])
            .build()
            .unwrap();
        assert!(query.as_str().contains("types=info%2Calert"));
    }

    #[test]
    fn empty_types_add_no_parameter() {
        let query = QueryBuilder::new(BASE).account("a").build().unwrap();
        assert!(!query.as_str().contains("types"));
    }

    #[test]
    fn time_bounds_render_as_epoch_millis() {
        let from = OffsetDateTime::from_unix_timestamp(1_600_000_000).unwrap();
        let to = OffsetDateTime::from_unix_timestamp(1_600_000_100).unwrap();
        let query = QueryBuilder::new(BASE).from(from).to(to).build().unwrap();
        assert!(query.as_str().contains("from=1600000000000"));
        assert!(query.as_str().contains("to=1600000100000"));
    }

    #[test]
    fn cloud_resource_filters_are_appended() {
        let query = QueryBuilder::new(BASE)
            .cloud_resource("https://aws.example.com/instances/i-1")
            .cloud_resource_type("instance")
            .build()
            .unwrap();
        assert!(query.as_str().contains("cloud_resource="));
        assert!(query.as_str().contains("cloud_resource_type=instance"));
    }

    #[test]
    fn bad_base_uri_is_a_url_error() {
        let err = QueryBuilder::new("not a url").build().unwrap_err();
        assert!(matches!(err, EventApiError::Url(_)));
    }
}
