//! Services Platform endpoint configuration.
//!
//! Every derived URL in the SDK (service targets, the event collection)
//! is joined against a [`ServicesEndpoint`]. The production base is the
//! default; a development base or any other endpoint can be supplied
//! explicitly at client construction or per target build.

use url::Url;

use crate::error::EventApiError;

/// Base URL of the production Services Platform.
pub const PRODUCTION_BASE_URL: &str = "https://services-platform.cloudbees.com/";

/// Base URL of the development Services Platform.
pub const DEV_BASE_URL: &str = "https://services-dev.apps.cloudbees.com/";

/// Environment variable read by [`ServicesEndpoint::from_env`]. Nothing
/// else in the SDK consults the environment.
pub const ENDPOINT_ENV_VAR: &str = "SP_URL";

/// A validated Services Platform base endpoint.
///
/// The base always carries a trailing slash on its path so that joins
/// append segments instead of replacing the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesEndpoint {
    base: Url,
}

impl ServicesEndpoint {
    /// The production endpoint, [`PRODUCTION_BASE_URL`].
    pub fn production() -> Self {
        Self {
            base: Url::parse(PRODUCTION_BASE_URL).expect("constant base URL is well-formed"),
        }
    }

    /// The development endpoint, [`DEV_BASE_URL`].
    pub fn development() -> Self {
        Self {
            base: Url::parse(DEV_BASE_URL).expect("constant base URL is well-formed"),
        }
    }

    /// Parse an arbitrary base URL.
    pub fn parse(input: &str) -> Result<Self, EventApiError> {
        Ok(Self::new(Url::parse(input)?))
    }

    /// Wrap an already parsed base URL.
    pub fn new(base: Url) -> Self {
        Self {
            base: ensure_trailing_slash(base),
        }
    }

    /// Resolve the endpoint from the `SP_URL` environment variable.
    ///
    /// Opt-in only: call this and pass the result where an endpoint is
    /// expected. Any value that is not exactly [`DEV_BASE_URL`] or
    /// [`PRODUCTION_BASE_URL`] falls back to production.
    pub fn from_env() -> Self {
        match std::env::var(ENDPOINT_ENV_VAR) {
            Ok(value) if value == DEV_BASE_URL => Self::development(),
            Ok(value) if value == PRODUCTION_BASE_URL => Self::production(),
            _ => Self::production(),
        }
    }

    /// The base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Join a relative path onto the base.
    pub fn join(&self, path: &str) -> Result<Url, EventApiError> {
        Ok(self.base.join(path)?)
    }
}

fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
