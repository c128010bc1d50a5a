//! Runtime configuration read from the environment (after `.env` is loaded)

use std::time::Duration;
use thiserror::Error;

const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_REQUESTS_PER_SECOND: usize = 20;
const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for the API client and the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    /// A source that takes longer than this is treated as failed
    pub source_timeout: Duration,
    pub max_requests_per_second: usize,
}

impl DashboardConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            source_timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
            max_requests_per_second: DEFAULT_MAX_REQUESTS_PER_SECOND,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the process env in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("MARKETPLACE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("MARKETPLACE_API_URL"))?;

        let mut config = Self::new(api_base_url.trim().trim_end_matches('/'));

        if let Some(raw) = lookup("DASHBOARD_SOURCE_TIMEOUT_SECS") {
            let secs: u64 = parse_positive(&raw, "DASHBOARD_SOURCE_TIMEOUT_SECS")?;
            config.source_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("MARKETPLACE_MAX_RPS") {
            config.max_requests_per_second = parse_positive(&raw, "MARKETPLACE_MAX_RPS")?;
        }

        Ok(config)
    }
}

fn parse_positive<T>(raw: &str, key: &'static str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}

/// Who is asking, passed into every load instead of living in a global
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub language: String,
}

impl Session {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_id = lookup("MARKETPLACE_SESSION_ID")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("MARKETPLACE_SESSION_ID"))?;
        let session = Self::new(session_id.trim());

        Ok(match lookup("MARKETPLACE_LANGUAGE").filter(|v| !v.trim().is_empty()) {
            Some(language) => session.with_language(language.trim()),
            None => session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = DashboardConfig::from_lookup(lookup_from(&[(
            "MARKETPLACE_API_URL",
            "https://api.example.com/api/",
        )]))
        .expect("config");

        assert_eq!(config.api_base_url, "https://api.example.com/api");
        assert_eq!(config.source_timeout, Duration::from_secs(15));
        assert_eq!(config.max_requests_per_second, 20);
    }

    #[test]
    fn test_missing_and_invalid_values() {
        assert_eq!(
            DashboardConfig::from_lookup(lookup_from(&[])),
            Err(ConfigError::Missing("MARKETPLACE_API_URL"))
        );

        let result = DashboardConfig::from_lookup(lookup_from(&[
            ("MARKETPLACE_API_URL", "http://localhost"),
            ("MARKETPLACE_MAX_RPS", "0"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "MARKETPLACE_MAX_RPS", .. })));
    }

    #[test]
    fn test_session_language() {
        let session = Session::from_lookup(lookup_from(&[
            ("MARKETPLACE_SESSION_ID", "abc"),
            ("MARKETPLACE_LANGUAGE", "es"),
        ]))
        .expect("session");
        assert_eq!(session, Session::new("abc").with_language("es"));

        let default_lang = Session::from_lookup(lookup_from(&[("MARKETPLACE_SESSION_ID", "abc")]))
            .expect("session");
        assert_eq!(default_lang.language, "en");
    }
}
