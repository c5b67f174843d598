//! Client configuration.
//!
//! Every tunable of [`Orchestra`](crate::Orchestra) lives here. Only the base
//! URL is required; the rest default to the values documented on each field.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{OrchestraError, Result};

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How payloads are checked before being turned into models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaPolicy {
    /// Missing fields take their declared defaults; nothing is rejected.
    #[default]
    Lenient,
    /// Each model's required fields (at least `id`) must be present.
    Strict,
}

/// How raw address rows are folded into mail services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressGrouping {
    /// Fold only consecutive rows sharing a key; relies on the backend
    /// returning rows ordered by mailbox.
    ContiguousRuns,
    /// Fold every row sharing a key; groups keep first-appearance order.
    #[default]
    ByKey,
}

/// Resources an account type is allowed to hold. `None` means unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    #[serde(default)]
    pub mailbox: Option<u32>,
    /// Disk quota in MB.
    #[serde(default)]
    pub disk: Option<u32>,
    /// Monthly traffic quota in MB.
    #[serde(default)]
    pub traffic: Option<u32>,
}

/// Orchestra client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestraConfig {
    /// API root, e.g. `https://panel.example.org/api/` (required).
    pub base_url: Url,
    /// Connect timeout. Default 10 s.
    #[serde(default = "default_connect_timeout", with = "duration_secs")]
    pub connect_timeout: Duration,
    /// Whole-request timeout. Default 30 s.
    #[serde(default = "default_request_timeout", with = "duration_secs")]
    pub request_timeout: Duration,
    /// Default [`SchemaPolicy::Lenient`].
    #[serde(default)]
    pub schema_policy: SchemaPolicy,
    /// Default [`AddressGrouping::ByKey`].
    #[serde(default)]
    pub address_grouping: AddressGrouping,
    /// Allowed resources per account type (keys upper-case, e.g. `INDIVIDUAL`).
    /// Defaults to INDIVIDUAL → 2 mailboxes, ASSOCIATION → 10 mailboxes.
    #[serde(default = "default_allowed_resources")]
    pub allowed_resources: BTreeMap<String, ResourceLimits>,
}

impl OrchestraConfig {
    /// Create a configuration from a base URL with all other values defaulted.
    ///
    /// A missing trailing `/` is added so that relative route paths are joined
    /// below the API root instead of replacing its last segment.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            schema_policy: SchemaPolicy::default(),
            address_grouping: AddressGrouping::default(),
            allowed_resources: default_allowed_resources(),
        })
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| OrchestraError::InvalidConfig {
            detail: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut config: Self =
            serde_json::from_str(text).map_err(|e| OrchestraError::InvalidConfig {
                detail: e.to_string(),
            })?;
        config.base_url = normalize_base_url(config.base_url)?;
        config.allowed_resources = std::mem::take(&mut config.allowed_resources)
            .into_iter()
            .map(|(account_type, limits)| (account_type.to_uppercase(), limits))
            .collect();
        Ok(config)
    }

    #[must_use]
    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    #[must_use]
    pub fn with_schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }

    #[must_use]
    pub fn with_address_grouping(mut self, grouping: AddressGrouping) -> Self {
        self.address_grouping = grouping;
        self
    }

    #[must_use]
    pub fn with_allowed_resources(
        mut self,
        account_type: impl Into<String>,
        limits: ResourceLimits,
    ) -> Self {
        self.allowed_resources
            .insert(account_type.into().to_uppercase(), limits);
        self
    }

    /// Limits for an account type, matched case-insensitively.
    pub fn limits_for(&self, account_type: &str) -> Option<&ResourceLimits> {
        self.allowed_resources.get(&account_type.to_uppercase())
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| OrchestraError::InvalidConfig {
        detail: format!("base_url '{raw}': {e}"),
    })?;
    normalize_base_url(url)
}

fn normalize_base_url(mut url: Url) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(OrchestraError::InvalidConfig {
            detail: format!("base_url '{url}' cannot be a base"),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn default_allowed_resources() -> BTreeMap<String, ResourceLimits> {
    BTreeMap::from([
        (
            "INDIVIDUAL".to_string(),
            ResourceLimits {
                mailbox: Some(2),
                ..ResourceLimits::default()
            },
        ),
        (
            "ASSOCIATION".to_string(),
            ResourceLimits {
                mailbox: Some(10),
                ..ResourceLimits::default()
            },
        ),
    ])
}

/// Durations are written as whole seconds in config files.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
