//! Error types for the news client and the upstream providers.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a `/news` fetch failed.
///
/// Every variant is raised before the container is touched, so a failed
/// fetch leaves previously rendered content in place.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint answered with status {0}")]
    Status(StatusCode),

    #[error("malformed news listing: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure talking to an upstream news provider.
///
/// The server never surfaces these to clients; a failing provider just
/// contributes no articles.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} is not set")]
    MissingKey(&'static str),

    #[error("invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("provider request failed: {0}")]
    Http(reqwest::Error),

    #[error("provider answered with status {0}")]
    Status(StatusCode),

    #[error("unexpected provider payload: {0}")]
    Decode(#[from] serde_json::Error),
}

// Provider URLs carry API keys in the query string; keep them out of logs.
impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Http(e.without_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "endpoint answered with status 500 Internal Server Error");
    }

    #[test]
    fn test_missing_key_message() {
        let err = ProviderError::MissingKey("NEWSAPI_KEY");
        assert_eq!(err.to_string(), "NEWSAPI_KEY is not set");
    }
}
