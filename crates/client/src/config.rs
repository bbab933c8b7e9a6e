use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const ENV_BASE_URL: &str = "CONCILIADOR_API_URL";
pub const ENV_TIMEOUT: &str = "CONCILIADOR_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// No timeout unless set; the transport default applies.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: concat!("conciliador/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ClientError> {
        toml::from_str(content).map_err(|e| ClientError::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Applies `CONCILIADOR_API_URL` and `CONCILIADOR_TIMEOUT_SECS` from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ClientError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ClientError::Config(format!("{ENV_TIMEOUT} must be a number of seconds, got '{raw}'")))?;
            self.timeout_secs = Some(secs);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https://, got '{url}'"
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_point_to_localhost() {
        let c = ClientConfig::default();
        assert_eq!(c.base_url, DEFAULT_BASE_URL);
        assert!(c.timeout().is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let c = ClientConfig::from_toml("base_url = \"https://api.example.co/\"\n").unwrap();
        assert_eq!(c.normalized_base_url(), "https://api.example.co");
        assert!(c.timeout_secs.is_none());
        assert!(ClientConfig::from_toml("base_url = 3").is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let c = ClientConfig::new("http://file:8000")
            .with_overrides(env(&[(ENV_BASE_URL, "http://env:9000"), (ENV_TIMEOUT, "30")]))
            .unwrap();
        assert_eq!(c.base_url, "http://env:9000");
        assert_eq!(c.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = ClientConfig::default()
            .with_overrides(env(&[(ENV_TIMEOUT, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn validate_rejects_non_http_urls() {
        assert!(ClientConfig::new("ftp://x").validate().is_err());
    }
}
