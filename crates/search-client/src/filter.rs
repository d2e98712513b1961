//! Conjunctive filter expressions for the hosted index.

/// Build the hosted-index filter string:
/// `(categories:c1 OR categories:c2 …) AND (labels:l1 OR labels:l2 …)`.
///
/// Empty groups are omitted entirely; with no filters at all the result is
/// the empty string and the caller applies no filter.
pub fn filter_expression(categories: &[String], labels: &[String]) -> String {
    let groups: Vec<String> = [("categories", categories), ("labels", labels)]
        .into_iter()
        .filter_map(|(field, terms)| group(field, terms))
        .collect();
    groups.join(" AND ")
}

fn group(field: &str, terms: &[String]) -> Option<String> {
    if terms.is_empty() {
        return None;
    }
    let body = terms
        .iter()
        .map(|term| format!("{field}:{term}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    Some(format!("({body})"))
}
