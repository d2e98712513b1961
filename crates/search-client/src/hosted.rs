//! Hosted-index backend: queries the managed search service directly.
//!
//! The index name is fixed; the service's response fields (`nbHits`,
//! zero-based `page`, `nbPages`, `hits`, `hitsPerPage`) are remapped into
//! the normalized [`SearchResult`] shape, and every hit gains a
//! `stats.currentInstalls` projection copied from its top-level install
//! count.

use crate::error::SearchError;
use crate::filter::filter_expression;
use crate::SearchBackend;
use async_trait::async_trait;
use search_types::{PluginHit, SearchCriteria, SearchResult};
use serde::{Deserialize, Serialize};

/// Logical collection holding all plugin records.
pub const INDEX_NAME: &str = "Plugins";

const HEADER_APP_ID: &str = "X-Algolia-Application-Id";
const HEADER_API_KEY: &str = "X-Algolia-API-Key";

/// Client for the hosted search index.
#[derive(Debug, Clone)]
pub struct HostedIndexBackend {
    client: reqwest::Client,
    app_id: String,
    api_key: String,
    endpoint: String,
}

impl HostedIndexBackend {
    pub fn new(
        client: reqwest::Client,
        app_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let app_id = app_id.into();
        let endpoint = format!("https://{app_id}-dsn.algolia.net/1/indexes/{INDEX_NAME}/query");
        Self {
            client,
            app_id,
            api_key: api_key.into(),
            endpoint,
        }
    }

    /// Override the query endpoint (self-hosted proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn index_query<'a>(&self, criteria: &'a SearchCriteria, filters: &'a str) -> IndexQuery<'a> {
        IndexQuery {
            query: &criteria.query,
            filters: (!filters.is_empty()).then_some(filters),
            // The service counts pages from zero; criteria pages are 1-based.
            page: criteria.page.map(|p| p.saturating_sub(1)),
        }
    }
}

#[async_trait]
impl SearchBackend for HostedIndexBackend {
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult, SearchError> {
        let filters = filter_expression(&criteria.categories, &criteria.labels);
        let body = self.index_query(criteria, &filters);
        tracing::debug!(query = %criteria.query, filters = ?body.filters, "querying hosted index");

        let response = self
            .client
            .post(&self.endpoint)
            .header(HEADER_APP_ID, &self.app_id)
            .header(HEADER_API_KEY, &self.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::from_response(response).await);
        }

        let parsed: IndexResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(map_response(parsed))
    }
}

#[derive(Debug, Serialize)]
struct IndexQuery<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(rename = "nbHits")]
    nb_hits: u64,
    page: u32,
    #[serde(rename = "nbPages")]
    nb_pages: u32,
    hits: Vec<PluginHit>,
    #[serde(rename = "hitsPerPage")]
    hits_per_page: u32,
}

fn map_response(response: IndexResponse) -> SearchResult {
    SearchResult {
        total: response.nb_hits,
        pages: response.nb_pages,
        page: response.page + 1,
        limit: response.hits_per_page,
        plugins: response
            .hits
            .into_iter()
            .map(PluginHit::with_install_stats)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> HostedIndexBackend {
        HostedIndexBackend::new(reqwest::Client::new(), "APP123", "searchkey")
    }

    #[test]
    fn endpoint_targets_the_fixed_index() {
        assert_eq!(
            backend().endpoint,
            "https://APP123-dsn.algolia.net/1/indexes/Plugins/query"
        );
    }

    #[test]
    fn query_body_omits_empty_filters_and_absent_page() {
        let criteria = search_types::SearchCriteria::new("git");
        let body = backend().index_query(&criteria, "");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"query": "git"})
        );
    }

    #[test]
    fn query_body_sends_zero_based_page() {
        let criteria = search_types::SearchCriteria::new("git").with_page(3);
        let body = backend().index_query(&criteria, "(labels:x)");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"query": "git", "filters": "(labels:x)", "page": 2})
        );
    }

    #[test]
    fn response_maps_into_normalized_result() {
        let parsed: IndexResponse = serde_json::from_value(json!({
            "nbHits": 5,
            "page": 0,
            "nbPages": 1,
            "hits": [{"id": 1, "currentInstalls": 10}],
            "hitsPerPage": 20
        }))
        .unwrap();

        let result = map_response(parsed);
        assert_eq!(result.total, 5);
        assert_eq!(result.pages, 1);
        assert_eq!(result.page, 1);
        assert_eq!(result.limit, 20);
        assert_eq!(result.plugins.len(), 1);

        let hit = &result.plugins[0];
        assert_eq!(hit.current_installs, Some(10));
        assert_eq!(hit.stats.current_installs, Some(10));
        assert_eq!(hit.fields.get("id"), Some(&json!(1)));
    }

    #[test]
    fn hits_without_install_counts_stay_unset() {
        let parsed: IndexResponse = serde_json::from_value(json!({
            "nbHits": 1,
            "page": 2,
            "nbPages": 4,
            "hits": [{"name": "ssh"}],
            "hitsPerPage": 20
        }))
        .unwrap();

        let result = map_response(parsed);
        assert_eq!(result.page, 3);
        assert_eq!(result.plugins[0].stats.current_installs, None);
    }
}
