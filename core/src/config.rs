//! Client configuration.

use std::time::Duration;

use crate::error::{RegistryError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/apis/registry/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "APICURIO_BASE_URL";
pub const ENV_AUTH_HEADER: &str = "APICURIO_AUTH_HEADER";
pub const ENV_TIMEOUT_SECS: &str = "APICURIO_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Registry API root, e.g. `http://host:8080/apis/registry/v3`.
    pub base_url: String,
    /// Sent verbatim as the `Authorization` header on every request.
    pub auth_header: Option<String>,
    /// End-to-end bound on each call, enforced by the default transport.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_header: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `APICURIO_BASE_URL`, `APICURIO_AUTH_HEADER` and
    /// `APICURIO_TIMEOUT_SECS`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }
        config.auth_header = lookup(ENV_AUTH_HEADER).filter(|v| !v.is_empty());
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|e| RegistryError::Config {
                key: ENV_TIMEOUT_SECS,
                message: format!("{raw:?} is not a number of seconds: {e}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
