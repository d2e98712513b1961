//! Error taxonomy for search requests.
//!
//! Backend selection is static and cannot fail; malformed criteria input is
//! normalized upstream rather than rejected. What remains is the transport:
//! a non-2xx response, a connection-level failure, or a body that does not
//! decode.

use thiserror::Error;

/// Failure of a single search request, either backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend answered with a status outside [200, 300).
    #[error("search request failed: {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        /// Response body, when one was readable. Kept for upstream
        /// inspection; not part of the display form.
        body: Option<String>,
    },

    /// Connection or protocol level failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected shape.
    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// Consume a non-success response into a [`SearchError::Status`],
    /// capturing the body when it is readable.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        SearchError::Status {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
            body: response.text().await.ok().filter(|b| !b.is_empty()),
        }
    }

    /// HTTP status code, when this failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::Status { status, .. } => Some(*status),
            SearchError::Transport(err) => err.status().map(|s| s.as_u16()),
            SearchError::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_exposes_status_text() {
        let err = SearchError::Status {
            status: 404,
            status_text: "Not Found".into(),
            body: None,
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "search request failed: 404 Not Found");
    }

    #[tokio::test]
    async fn non_success_response_becomes_status_error() {
        let response = http::Response::builder()
            .status(404)
            .body("no such plugin".to_string())
            .unwrap();
        let err = SearchError::from_response(reqwest::Response::from(response)).await;
        match err {
            SearchError::Status {
                status,
                status_text,
                body,
            } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
                assert_eq!(body.as_deref(), Some("no such plugin"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_error_body_is_dropped() {
        let response = http::Response::builder()
            .status(500)
            .body(String::new())
            .unwrap();
        let err = SearchError::from_response(reqwest::Response::from(response)).await;
        match err {
            SearchError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, None);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn decode_error_has_no_status() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SearchError::from(inner);
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("malformed search response"));
    }
}
