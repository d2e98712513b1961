//! Shared criteria and result types for the plugindex search client.
//!
//! These types intentionally avoid heavy dependencies and aim to match the
//! wire shapes of both backends, so the REST response body parses directly
//! into [`SearchResult`] with no remapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod config;
pub mod query;

pub use config::SearchConfig;

/// Sort orders understood by both backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    Relevance,
    Installed,
    Trend,
    Updated,
    Title,
}

impl Sort {
    pub const fn as_str(self) -> &'static str {
        match self {
            Sort::Relevance => "relevance",
            Sort::Installed => "installed",
            Sort::Trend => "trend",
            Sort::Updated => "updated",
            Sort::Title => "title",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a sort key is not one of the known string forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key `{0}`")]
pub struct ParseSortError(String);

impl FromStr for Sort {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(Sort::Relevance),
            "installed" => Ok(Sort::Installed),
            "trend" => Ok(Sort::Trend),
            "updated" => Ok(Sort::Updated),
            "title" => Ok(Sort::Title),
            other => Err(ParseSortError(other.to_string())),
        }
    }
}

/// Normalized set of user-chosen search constraints.
///
/// `categories` and `labels` are always sequences with empty entries
/// removed, even when the source supplied a single scalar; deserialization
/// goes through [`RawCriteria`] so a JSON payload carrying
/// `"categories": "ios"` coerces to a one-element sequence instead of
/// failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCriteria")]
pub struct SearchCriteria {
    pub query: String,
    pub categories: Vec<String>,
    pub labels: Vec<String>,
    pub sort: Option<Sort>,
    pub page: Option<u32>,
}

impl SearchCriteria {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = normalize_terms(categories);
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = normalize_terms(labels);
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// Drop falsy (empty) entries while collecting filter terms.
pub fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    terms
        .into_iter()
        .map(Into::into)
        .filter(|t| !t.is_empty())
        .collect()
}

/// A value that may arrive as a single scalar or a sequence.
///
/// Naive query-string parsing delivers a lone `categories=x` as a scalar;
/// both shapes normalize to a sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        }
    }
}

/// Criteria as delivered by loosely-typed sources (query strings, JS-shaped
/// JSON). Converts into [`SearchCriteria`] with normalization applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCriteria {
    #[serde(default, alias = "q")]
    pub query: Option<String>,
    #[serde(default)]
    pub categories: Option<OneOrMany<String>>,
    #[serde(default)]
    pub labels: Option<OneOrMany<String>>,
    #[serde(default)]
    pub sort: Option<Sort>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl From<RawCriteria> for SearchCriteria {
    fn from(raw: RawCriteria) -> Self {
        SearchCriteria {
            query: raw.query.unwrap_or_default(),
            categories: normalize_terms(raw.categories.map_or_else(Vec::new, OneOrMany::into_vec)),
            labels: normalize_terms(raw.labels.map_or_else(Vec::new, OneOrMany::into_vec)),
            sort: raw.sort,
            page: raw.page,
        }
    }
}

/// Normalized result set produced by either backend.
///
/// Field names match the REST wire shape exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matches across all pages.
    pub total: u64,
    /// Total page count.
    pub pages: u32,
    /// Current page, 1-based.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Matched records for the current page, in backend order.
    pub plugins: Vec<PluginHit>,
}

/// Install-count projection carried on every hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginStats {
    #[serde(rename = "currentInstalls", skip_serializing_if = "Option::is_none")]
    pub current_installs: Option<u64>,
}

/// A single matched record.
///
/// Backends disagree on everything except the install count, so only that
/// projection is typed; the remaining fields ride along in `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginHit {
    #[serde(
        rename = "currentInstalls",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_installs: Option<u64>,
    #[serde(default)]
    pub stats: PluginStats,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl PluginHit {
    /// Copy the top-level install count into `stats.currentInstalls`.
    #[must_use]
    pub fn with_install_stats(mut self) -> Self {
        self.stats.current_installs = self.current_installs;
        self
    }

    /// Best-effort human-readable name for display purposes.
    pub fn display_name(&self) -> Option<&str> {
        ["title", "name", "id"]
            .iter()
            .find_map(|k| self.fields.get(*k).and_then(serde_json::Value::as_str))
    }
}
