//! REST fallback backend: `GET {base}/plugins?{criteria}`.
//!
//! The success body is already the normalized [`SearchResult`] shape, so it
//! parses directly with no field remapping. Any status outside [200, 300)
//! is a failure carrying the response's status text and body.

use crate::error::SearchError;
use crate::SearchBackend;
use async_trait::async_trait;
use search_types::{query, SearchCriteria, SearchResult};

/// Client for the first-party plugin API.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: reqwest::Client,
    base: String,
}

impl RestBackend {
    pub fn new(client: reqwest::Client, base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { client, base }
    }

    fn plugins_url(&self, criteria: &SearchCriteria) -> String {
        format!("{}/plugins?{}", self.base, query::encode(criteria))
    }
}

#[async_trait]
impl SearchBackend for RestBackend {
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult, SearchError> {
        let url = self.plugins_url(criteria);
        tracing::debug!(%url, "querying plugin REST API");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SearchError::from_response(response).await);
        }

        Ok(serde_json::from_slice(&response.bytes().await?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_types::Sort;

    fn backend(base: &str) -> RestBackend {
        RestBackend::new(reqwest::Client::new(), base)
    }

    #[test]
    fn url_uses_stable_query_serialization() {
        let criteria = SearchCriteria::new("foo").with_page(2);
        assert_eq!(
            backend("/api").plugins_url(&criteria),
            "/api/plugins?categories=&labels=&page=2&q=foo&sort="
        );
    }

    #[test]
    fn url_repeats_sequence_keys() {
        let criteria = SearchCriteria::new("git")
            .with_categories(["scm", "ci"])
            .with_sort(Sort::Installed)
            .with_page(1);
        assert_eq!(
            backend("https://plugins.example.org/api/").plugins_url(&criteria),
            "https://plugins.example.org/api/plugins?categories=scm&categories=ci&labels=&page=1&q=git&sort=installed"
        );
    }
}
