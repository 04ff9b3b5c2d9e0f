//! Manager configuration.
//!
//! Defaults point at the public restful-api.dev test endpoint. Environment
//! variables override the defaults:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `RESTCRUD_BASE_URL` | Base URL of the API |
//! | `RESTCRUD_COLLECTION` | Collection path segment |
//! | `RESTCRUD_TIMEOUT_MS` | Per-request timeout in milliseconds |
//! | `RESTCRUD_SLOTS` | `positional` or `keyed` field assignment |

use std::time::Duration;

use url::Url;

use crate::error::{ConfigError, CrudError};
use crate::fields::SlotAssignment;

pub const DEFAULT_BASE_URL: &str = "https://api.restful-api.dev";
pub const DEFAULT_COLLECTION: &str = "objects";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_BASE_URL: &str = "RESTCRUD_BASE_URL";
pub const ENV_COLLECTION: &str = "RESTCRUD_COLLECTION";
pub const ENV_TIMEOUT_MS: &str = "RESTCRUD_TIMEOUT_MS";
pub const ENV_SLOTS: &str = "RESTCRUD_SLOTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    base_url: Url,
    collection: String,
    timeout: Duration,
    assignment: SlotAssignment,
}

impl ManagerConfig {
    /// Configuration for `base_url` with default collection and timeout.
    ///
    /// The base URL is normalised to end with `/` so the collection segment
    /// is appended rather than replacing the last path segment.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(base_url).map_err(|source| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeABase {
                url: base_url.to_string(),
            });
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url,
            collection: DEFAULT_COLLECTION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            assignment: SlotAssignment::default(),
        })
    }

    /// Defaults overlaid with the `RESTCRUD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ManagerConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Some(collection) = lookup(ENV_COLLECTION) {
            config = config.with_collection(collection)?;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            let millis: u64 = timeout
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidSetting {
                    name: ENV_TIMEOUT_MS,
                    message: format!("'{}': {}", timeout, e),
                })?;
            config = config.with_timeout(Duration::from_millis(millis));
        }

        if let Some(slots) = lookup(ENV_SLOTS) {
            let assignment: SlotAssignment = slots
                .parse()
                .map_err(|message| ConfigError::InvalidSetting {
                    name: ENV_SLOTS,
                    message,
                })?;
            config = config.with_assignment(assignment);
        }

        Ok(config)
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Result<Self, ConfigError> {
        let collection = collection.into().trim_matches('/').to_string();
        if collection.is_empty() {
            return Err(ConfigError::EmptyCollection);
        }
        self.collection = collection;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_assignment(mut self, assignment: SlotAssignment) -> Self {
        self.assignment = assignment;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn assignment(&self) -> SlotAssignment {
        self.assignment
    }

    /// `BASE/{collection}`
    pub fn collection_url(&self) -> Url {
        // `new` rejected cannot-be-a-base URLs and `with_collection` keeps the
        // segment free of leading or trailing slashes, so the join is total.
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{}", self.base_url.path(), self.collection));
        url
    }

    /// `BASE/{collection}/{id}` with `id` percent-encoded as one segment.
    pub fn item_url(&self, id: &str) -> Result<Url, CrudError> {
        let mut url = self.collection_url();
        url.path_segments_mut()
            .map_err(|_| CrudError::validation(format!("cannot address object '{}'", id)))?
            .push(id);
        Ok(url)
    }
}
