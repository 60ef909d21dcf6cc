//! GitHub REST API access for pull request files and labels.

pub mod client;
pub mod error;

pub use client::GitHubClient;
pub use error::GitHubError;
