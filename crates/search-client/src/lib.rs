//! HTTP search backends and the dispatch layer for plugindex.
//!
//! Two interchangeable backends sit behind the [`SearchBackend`]
//! capability: a hosted search index queried directly, and a first-party
//! REST API used as the fallback. Selection happens once at startup from a
//! [`SearchConfig`]; rendering code only ever sees the normalized
//! [`SearchResult`](search_types::SearchResult) shape and never learns
//! which backend served it.

use async_trait::async_trait;
use search_types::{SearchConfig, SearchCriteria, SearchResult};
use std::sync::Arc;

pub mod dispatch;
pub mod error;
pub mod filter;
pub mod hosted;
pub mod rest;

pub use dispatch::{Dispatcher, ErrorKind, SearchFailure, SearchState};
pub use error::SearchError;
pub use filter::filter_expression;
pub use hosted::HostedIndexBackend;
pub use rest::RestBackend;

/// Backend capability shared by the hosted index and the REST fallback.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult, SearchError>;
}

/// Select a backend from configuration: hosted iff both credentials are
/// present, REST otherwise. A static, whole-process choice.
pub fn backend_from_config(
    config: &SearchConfig,
    client: reqwest::Client,
) -> Arc<dyn SearchBackend> {
    if let Some((app_id, api_key)) = config.hosted_credentials() {
        tracing::debug!(app_id, "selected hosted-index backend");
        Arc::new(HostedIndexBackend::new(client, app_id, api_key))
    } else {
        tracing::debug!(base = config.rest_base(), "selected REST backend");
        Arc::new(RestBackend::new(client, config.rest_base()))
    }
}

/// Human-readable name of the backend the configuration selects.
pub fn selected_backend(config: &SearchConfig) -> &'static str {
    if config.hosted_credentials().is_some() {
        "hosted-index"
    } else {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_requires_both_hosted_credentials() {
        let hosted = SearchConfig {
            app_id: Some("APP123".into()),
            api_key: Some("searchkey".into()),
            rest_base_url: None,
        };
        assert_eq!(selected_backend(&hosted), "hosted-index");

        let partial = SearchConfig {
            api_key: None,
            ..hosted
        };
        assert_eq!(selected_backend(&partial), "rest");
    }
}
