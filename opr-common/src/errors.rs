//! Error types for the GitHub client.
//!
//! Authentication and network failures are not retried or recovered; they
//! abort the current command. There is no backoff or rate-limit handling.

use thiserror::Error;

/// Errors surfaced by the GitHub REST client.
#[derive(Debug, Error)]
pub enum GithubError {
    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level failure (DNS, TLS, connect, body read).
    #[error("request to {route} failed: {source}")]
    Transport {
        route: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status from the API.
    #[error("GitHub API returned {status} for {route}: {message}")]
    Status {
        route: String,
        status: u16,
        message: String,
    },

    /// Response body could not be decoded.
    #[error("could not decode response from {route}: {source}")]
    Decode {
        route: String,
        #[source]
        source: reqwest::Error,
    },

    /// Repository full name is not in `owner/name` form.
    #[error("malformed repository full name: {0}")]
    MalformedRepoName(String),
}
