//! GitHub REST API errors.

use thiserror::Error;

/// Failures talking to the GitHub REST API.
#[derive(Error, Debug)]
pub enum GitHubError {
    /// The request could not be sent or the response not read.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The API answered with a non-success status.
    #[error("GitHub API request failed: HTTP {status}: {body}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Invalid response format from GitHub API: {0}")]
    InvalidResponseFormat(String),

    /// The configured API root is not a usable URL.
    #[error("Invalid GitHub API URL \"{url}\": {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },
}
