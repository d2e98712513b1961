//! Backend configuration, read once at startup.
//!
//! The dispatcher never consults the environment itself; callers build a
//! [`SearchConfig`] (usually via [`SearchConfig::from_env`]) and pass it in
//! at construction time.

use std::env;

/// Hosted-index application identifier.
pub const ENV_APP_ID: &str = "PLUGINDEX_APP_ID";
/// Hosted-index search-only API key.
pub const ENV_API_KEY: &str = "PLUGINDEX_API_KEY";
/// Base URL override for the REST fallback.
pub const ENV_API_URL: &str = "PLUGINDEX_API_URL";

/// Default REST base when no override is configured.
pub const DEFAULT_REST_BASE: &str = "/api";

/// Environment-level switches controlling backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    pub app_id: Option<String>,
    pub api_key: Option<String>,
    pub rest_base_url: Option<String>,
}

impl SearchConfig {
    /// Snapshot the relevant environment variables. Empty values count as
    /// unset so a blank `PLUGINDEX_APP_ID=` does not select the hosted
    /// backend with unusable credentials.
    pub fn from_env() -> Self {
        Self {
            app_id: non_empty_var(ENV_APP_ID),
            api_key: non_empty_var(ENV_API_KEY),
            rest_base_url: non_empty_var(ENV_API_URL),
        }
    }

    /// Credentials for the hosted-index backend, when fully configured.
    pub fn hosted_credentials(&self) -> Option<(&str, &str)> {
        match (self.app_id.as_deref(), self.api_key.as_deref()) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => Some((id, key)),
            _ => None,
        }
    }

    /// REST base URL: the configured override or [`DEFAULT_REST_BASE`].
    pub fn rest_base(&self) -> &str {
        self.rest_base_url
            .as_deref()
            .filter(|base| !base.is_empty())
            .unwrap_or(DEFAULT_REST_BASE)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_requires_both_credentials() {
        let mut cfg = SearchConfig {
            app_id: Some("APP123".into()),
            api_key: None,
            rest_base_url: None,
        };
        assert_eq!(cfg.hosted_credentials(), None);

        cfg.api_key = Some("key".into());
        assert_eq!(cfg.hosted_credentials(), Some(("APP123", "key")));

        cfg.app_id = Some(String::new());
        assert_eq!(cfg.hosted_credentials(), None);
    }

    #[test]
    fn rest_base_falls_back_to_default() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.rest_base(), "/api");

        let cfg = SearchConfig {
            rest_base_url: Some("https://plugins.example.org/api".into()),
            ..SearchConfig::default()
        };
        assert_eq!(cfg.rest_base(), "https://plugins.example.org/api");
    }
}
