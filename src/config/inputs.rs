//! Action inputs.
//!
//! Inputs are delivered as `INPUT_<NAME>` environment variables, where the
//! name is upper-cased and spaces become underscores.

use std::collections::HashMap;
use std::env;

use tracing::debug;

use crate::error::PolicyError;
use crate::policy::config::parse_length;
use crate::policy::{PolicyConfig, TextRule};

/// Input holding the API token.
pub const TOKEN: &str = "token";
/// Input holding the label configuration.
pub const LABELS: &str = "labels";
/// Input holding the commit title length limit.
pub const COMMIT_TITLE_LENGTH: &str = "commitTitleLength";
/// Input holding the commit title regex.
pub const COMMIT_TITLE_REGEX: &str = "commitTitleRegex";
/// Input enabling conventional commit validation.
pub const CONVENTIONAL_COMMITS: &str = "conventionalCommits";
/// Input holding the pull request title length limit.
pub const PR_TITLE_LENGTH: &str = "prTitleLength";
/// Input holding the pull request title regex.
pub const PR_TITLE_REGEX: &str = "prTitleRegex";
/// Input holding the pull request body regex.
pub const PR_BODY_REGEX: &str = "prBodyRegex";
/// Input naming the branch that receives squash merges.
pub const SQUASH_BRANCH: &str = "squashBranch";

/// Source of action input values.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    overrides: Option<HashMap<String, String>>,
}

impl ActionInputs {
    /// Reads inputs from the process environment.
    pub fn from_env() -> Self {
        Self { overrides: None }
    }

    /// Uses the given name/value pairs instead of the environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let overrides = pairs
            .into_iter()
            .map(|(k, v)| (env_key(&k.into()), v.into()))
            .collect();
        Self {
            overrides: Some(overrides),
        }
    }

    /// Returns the trimmed value of an input, or `None` when unset or blank.
    pub fn get(&self, name: &str) -> Option<String> {
        self.raw(name).map(|v| v.trim().to_string())
    }

    /// Returns an input exactly as supplied, or `None` when unset or blank.
    ///
    /// Multi-line inputs such as YAML keep their indentation.
    pub fn raw(&self, name: &str) -> Option<String> {
        let key = env_key(name);
        let value = match &self.overrides {
            Some(map) => map.get(&key).cloned(),
            None => env::var(&key).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Returns the value of an input that must be supplied.
    pub fn require(&self, name: &str) -> Result<String, PolicyError> {
        self.get(name).ok_or_else(|| PolicyError::MissingInput {
            name: name.to_string(),
        })
    }

    /// Returns whether a boolean input is exactly `true`.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).as_deref() == Some("true")
    }

    /// Builds the policy configuration from the inputs.
    pub fn policy_config(&self) -> Result<PolicyConfig, PolicyError> {
        let config = PolicyConfig {
            commit_title: TextRule {
                max_length: parse_length(
                    COMMIT_TITLE_LENGTH,
                    self.get(COMMIT_TITLE_LENGTH).as_deref(),
                )?,
                pattern: self.get(COMMIT_TITLE_REGEX),
            },
            pr_title: TextRule {
                max_length: parse_length(PR_TITLE_LENGTH, self.get(PR_TITLE_LENGTH).as_deref())?,
                pattern: self.get(PR_TITLE_REGEX),
            },
            pr_body_pattern: self.get(PR_BODY_REGEX),
            require_conventional: self.flag(CONVENTIONAL_COMMITS),
            squash_branch: self.get(SQUASH_BRANCH),
        };
        debug!(?config, "Loaded policy configuration from inputs");
        Ok(config)
    }
}

/// Environment variable carrying the named input.
pub fn env_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}
