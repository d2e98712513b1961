//! Query-string codec for the page URL contract.
//!
//! The search page encodes its criteria in its own address so results are
//! bookmarkable and re-derivable on load. Encoding uses a stable field
//! order (`categories, labels, page, q, sort`); sequence fields repeat the
//! key per element and collapse to a single empty-valued key when empty.

use crate::{Sort, SearchCriteria};
use url::form_urlencoded;

/// Serialize criteria as a query string (without the leading `?`).
///
/// The text field is emitted under the REST spelling `q`; the original
/// page's addresses spell it `query` (and carry a `view` key), and
/// [`parse`] accepts both, so either URL form re-derives the same
/// criteria.
pub fn encode(criteria: &SearchCriteria) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());
    append_terms(&mut ser, "categories", &criteria.categories);
    append_terms(&mut ser, "labels", &criteria.labels);
    match criteria.page {
        Some(page) => ser.append_pair("page", &page.to_string()),
        None => ser.append_pair("page", ""),
    };
    ser.append_pair("q", &criteria.query);
    ser.append_pair("sort", criteria.sort.map_or("", Sort::as_str));
    ser.finish()
}

fn append_terms(
    ser: &mut form_urlencoded::Serializer<'_, String>,
    key: &str,
    terms: &[String],
) {
    if terms.is_empty() {
        ser.append_pair(key, "");
        return;
    }
    for term in terms {
        ser.append_pair(key, term);
    }
}

/// Parse criteria from a query string, with or without the leading `?`.
///
/// Repeated keys accumulate; a lone scalar becomes a one-element sequence
/// by construction. Empty values and unknown keys (the page shell's `view`,
/// for one) are ignored, as are non-numeric `page` values.
pub fn parse(qs: &str) -> SearchCriteria {
    let qs = qs.strip_prefix('?').unwrap_or(qs);
    let mut criteria = SearchCriteria::default();
    for (key, value) in form_urlencoded::parse(qs.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "q" | "query" => criteria.query = value.into_owned(),
            "categories" => criteria.categories.push(value.into_owned()),
            "labels" => criteria.labels.push(value.into_owned()),
            "sort" => criteria.sort = value.parse().ok(),
            "page" => criteria.page = value.parse().ok(),
            _ => {}
        }
    }
    criteria
}
