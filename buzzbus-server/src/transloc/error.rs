//! TransLoc client error types.

use crate::planner::FetchError;

/// Errors from the TransLoc HTTP client and fixture loader.
#[derive(Debug, thiserror::Error)]
pub enum TranslocError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by TransLoc API")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Mock fixture directory could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl TranslocError {
    /// Attach the upstream resource name for the planner.
    pub fn into_fetch_error(self, resource: impl Into<String>) -> FetchError {
        FetchError {
            resource: resource.into(),
            message: self.to_string(),
        }
    }
}
