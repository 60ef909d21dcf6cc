//! Commit message and pull request text policies.

pub mod commits;
pub mod config;
pub mod conventional;
pub mod pull_request;
pub mod squash;
pub mod text;

pub use commits::{check_commits, CommitMode};
pub use config::{PolicyConfig, TextRule};
pub use conventional::{validate_conventional, ConventionalValidator, ParsedConventionalCommit};
pub use pull_request::{check_pull_request, PullRequestText};
pub use squash::{decompose, NestedCommit, SquashAggregate};
pub use text::check_text;
