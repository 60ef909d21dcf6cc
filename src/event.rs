//! Repository event context.
//!
//! The hook runner describes the triggering event with `GITHUB_EVENT_NAME`
//! and a JSON payload at `GITHUB_EVENT_PATH`.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::error::PolicyError;
use crate::policy::PullRequestText;

/// Default REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Events the dispatcher knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Commits pushed to a branch.
    Push,
    /// Pull request opened, edited or synchronized.
    PullRequest,
}

impl FromStr for EventKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(EventKind::Push),
            "pull_request" | "pull_request_target" => Ok(EventKind::PullRequest),
            other => Err(PolicyError::UnsupportedEvent {
                event: other.to_string(),
            }),
        }
    }
}

/// A commit as listed in a push payload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PushCommit {
    /// Full commit message.
    pub message: String,
}

/// The pull request section of a payload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PullRequestPayload {
    /// Pull request number.
    pub number: u64,
    /// Title, if any.
    #[serde(default)]
    pub title: Option<String>,
    /// Description, if any.
    #[serde(default)]
    pub body: Option<String>,
}

impl PullRequestPayload {
    /// The text fields checked by pull request policy.
    pub fn text(&self) -> PullRequestText {
        PullRequestText {
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

/// The parts of an event payload the dispatcher reads.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EventPayload {
    /// Pushed commits, oldest first.
    #[serde(default)]
    pub commits: Option<Vec<PushCommit>>,
    /// Pull request the event is about.
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,
    /// Full ref that was pushed, e.g. `refs/heads/main`.
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

impl EventPayload {
    /// Branch name of the pushed ref.
    pub fn branch(&self) -> Option<&str> {
        self.git_ref
            .as_deref()
            .map(|r| r.strip_prefix("refs/heads/").unwrap_or(r))
    }

    /// Messages of the pushed commits.
    pub fn commit_messages(&self) -> Option<Vec<&str>> {
        self.commits
            .as_ref()
            .map(|commits| commits.iter().map(|c| c.message.as_str()).collect())
    }

    /// Parses a payload from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse event payload")
    }

    /// Reads a payload file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse event payload: {}", path.display()))
    }
}

/// An `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Account or organisation.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl FromStr for RepoSlug {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(RepoSlug {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => bail!("Invalid repository \"{s}\", expected owner/repo"),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Everything known about the triggering event.
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Raw event name.
    pub event_name: String,
    /// Decoded payload.
    pub payload: EventPayload,
    /// Repository the event belongs to, when known.
    pub repository: Option<RepoSlug>,
    /// REST API root.
    pub api_url: String,
}

/// Values that take precedence over the runner environment.
#[derive(Debug, Clone, Default)]
pub struct EventOverrides {
    /// Event name instead of `GITHUB_EVENT_NAME`.
    pub event_name: Option<String>,
    /// Payload file instead of `GITHUB_EVENT_PATH`.
    pub event_path: Option<PathBuf>,
    /// `owner/repo` instead of `GITHUB_REPOSITORY`.
    pub repository: Option<String>,
    /// API root instead of `GITHUB_API_URL`.
    pub api_url: Option<String>,
}

impl EventContext {
    /// Reads the context from the runner environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(&EventOverrides::default())
    }

    /// Reads the context from the overrides, falling back to the environment.
    pub fn resolve(overrides: &EventOverrides) -> Result<Self> {
        let event_name = overrides
            .event_name
            .clone()
            .or_else(|| env_value("GITHUB_EVENT_NAME"))
            .context("No event name: set GITHUB_EVENT_NAME or pass --event-name")?;

        let event_path = overrides
            .event_path
            .clone()
            .or_else(|| env_value("GITHUB_EVENT_PATH").map(PathBuf::from));
        let payload = match event_path {
            Some(path) => EventPayload::load(path)?,
            None => {
                debug!("No event payload path, using an empty payload");
                EventPayload::default()
            }
        };

        let repository = overrides
            .repository
            .clone()
            .or_else(|| env_value("GITHUB_REPOSITORY"))
            .map(|r| r.parse())
            .transpose()?;
        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| env_value("GITHUB_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        debug!(%event_name, ?repository, %api_url, "Loaded event context");
        Ok(Self {
            event_name,
            payload,
            repository,
            api_url,
        })
    }

    /// Classifies the event.
    pub fn kind(&self) -> Result<EventKind, PolicyError> {
        self.event_name.parse()
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
