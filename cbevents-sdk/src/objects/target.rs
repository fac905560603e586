//! Event targets: what an event is about.

use serde::{Deserialize, Serialize};

use crate::endpoint::ServicesEndpoint;
use crate::error::EventApiError;

/// Base of every derived Services Platform type tag.
const TYPES_BASE: &str = "https://types.cloudbees.com/resource/services-platform";

/// The subject of an event: a resource URL plus descriptive type tags.
///
/// Clients that already know the URL of the cloud resource their event
/// concerns should construct a `Target` directly. Events about a
/// Services Platform subscription or resource should go through
/// [`ServiceTargetBuilder`] instead, which derives the canonical URL and
/// type tag from the service/account/resource identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    url: String,
    types: Vec<String>,
}

impl Target {
    /// Create a target from a resource URL and its type tags, stored
    /// exactly as given.
    pub fn new<I, S>(url: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// URL of the resource the event concerns.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Type tags, in the order they were supplied.
    pub fn types(&self) -> &[String] {
        &self.types
    }
}

/// Two-phase builder for Services Platform targets.
///
/// Setters only accumulate; validation and URL rendering happen in
/// [`build`](Self::build). A resource id is only meaningful inside an
/// account, so setting one without the other fails at build time.
#[derive(Debug, Clone)]
pub struct ServiceTargetBuilder {
    service: String,
    account: Option<String>,
    resource_id: Option<String>,
    resource_type: Option<String>,
}

impl ServiceTargetBuilder {
    /// Start a builder for the given service (for example `cb-app` or
    /// `cb-db`).
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: None,
            resource_id: None,
            resource_type: None,
        }
    }

    /// Account (domain) name owning the subscription or resource.
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Resource identifier within the account.
    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Specific resource type appended to the derived type tag.
    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Validate and render the target against the production endpoint.
    pub fn build(self) -> Result<Target, EventApiError> {
        self.build_with_endpoint(&ServicesEndpoint::production())
    }

    /// Validate and render the target against a specific endpoint.
    pub fn build_with_endpoint(
        self,
        endpoint: &ServicesEndpoint,
    ) -> Result<Target, EventApiError> {
        if self.service.is_empty() {
            return Err(EventApiError::Validation(
                "service must not be empty".into(),
            ));
        }

        let (path, type_tag) = match (&self.resource_id, &self.account) {
            (Some(resource_id), Some(account)) => {
                let path = format!(
                    "api/services/resources/{}/{}/{}",
                    urlencoding::encode(&self.service),
                    urlencoding::encode(account),
                    urlencoding::encode(resource_id),
                );
                let type_tag = match &self.resource_type {
                    Some(resource_type) => format!("{TYPES_BASE}/resource/{resource_type}"),
                    None => format!("{TYPES_BASE}/resource"),
                };
                (path, type_tag)
            }
            (Some(resource_id), None) => {
                return Err(EventApiError::Validation(format!(
                    "account must be set with resource id: {resource_id}"
                )));
            }
            (None, _) => {
                let path = match &self.account {
                    Some(account) => format!(
                        "api/services/subscriptions/{}/{}",
                        urlencoding::encode(&self.service),
                        urlencoding::encode(account),
                    ),
                    None => format!(
                        "api/services/subscriptions/{}",
                        urlencoding::encode(&self.service),
                    ),
                };
                let type_tag = format!("{TYPES_BASE}/service/{}", self.service);
                (path, type_tag)
            }
        };

        let url = endpoint.join(&path)?;
        Ok(Target {
            url: url.into(),
            types: vec![type_tag],
        })
    }
}
