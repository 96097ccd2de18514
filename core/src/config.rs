//! Client configuration.
//!
//! The only setting is the API base URL, prefixed to every request path.

use std::env;

use url::Url;

use crate::error::ConfigError;

pub const BASE_URL_ENV: &str = "TICKET_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Read the base URL from `TICKET_API_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var(BASE_URL_ENV).map_err(|_| ConfigError::Missing(BASE_URL_ENV))?;
        Self::new(&raw)
    }
}
