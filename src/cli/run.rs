//! Run command: handles the triggering event as a workflow step.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use crate::config::inputs::{ActionInputs, LABELS, TOKEN};
use crate::config::parse_label_config;
use crate::event::{EventContext, EventKind, EventOverrides};
use crate::github::GitHubClient;
use crate::label::{resolve, LabelSet};
use crate::policy::{check_commits, check_pull_request, CommitMode, PolicyConfig};

/// Run command options. Each flag overrides the matching runner variable.
#[derive(Parser)]
pub struct RunCommand {
    /// Event name (defaults to GITHUB_EVENT_NAME).
    #[arg(long, value_name = "NAME")]
    pub event_name: Option<String>,

    /// Event payload file (defaults to GITHUB_EVENT_PATH).
    #[arg(long, value_name = "PATH")]
    pub event_path: Option<PathBuf>,

    /// Repository as owner/repo (defaults to GITHUB_REPOSITORY).
    #[arg(long, value_name = "OWNER/REPO")]
    pub repository: Option<String>,

    /// REST API root (defaults to GITHUB_API_URL).
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Pushed commits were checked.
    Commits {
        /// Number of commits checked.
        checked: usize,
        /// How they were interpreted.
        mode: CommitMode,
    },
    /// A pull request was labelled and checked.
    PullRequest {
        /// Pull request number.
        number: u64,
        /// Labels applied.
        labels: LabelSet,
    },
    /// The payload had nothing to check.
    Skipped,
}

impl RunCommand {
    /// Executes the run command.
    pub async fn execute(self) -> Result<()> {
        let overrides = EventOverrides {
            event_name: self.event_name,
            event_path: self.event_path,
            repository: self.repository,
            api_url: self.api_url,
        };

        let result = async {
            let context = EventContext::resolve(&overrides)?;
            run_event(&context, &ActionInputs::from_env()).await
        }
        .await;

        match result {
            Ok(outcome) => {
                info!(?outcome, "Run finished");
                Ok(())
            }
            Err(e) => {
                println!("{}", error_annotation(&format!("{e:#}")));
                Err(e)
            }
        }
    }
}

/// Dispatches an event to the labeller and policy engines.
pub async fn run_event(context: &EventContext, inputs: &ActionInputs) -> Result<RunOutcome> {
    let config = inputs.policy_config()?;

    match context.kind()? {
        EventKind::Push => check_push(context, &config),
        EventKind::PullRequest => {
            let Some(pr) = &context.payload.pull_request else {
                debug!("Event has no pull request, nothing to do");
                return Ok(RunOutcome::Skipped);
            };

            let labels = label_pull_request(context, inputs, pr.number).await?;
            check_pull_request(Some(&pr.text()), &config)?;
            Ok(RunOutcome::PullRequest {
                number: pr.number,
                labels,
            })
        }
    }
}

fn check_push(context: &EventContext, config: &PolicyConfig) -> Result<RunOutcome> {
    let Some(messages) = context.payload.commit_messages() else {
        debug!("Event has no commits, nothing to do");
        return Ok(RunOutcome::Skipped);
    };

    let mode = CommitMode::for_branch(context.payload.branch(), config.squash_branch.as_deref());
    debug!(?mode, count = messages.len(), "Checking pushed commits");
    check_commits(&messages, mode, config)?;

    Ok(RunOutcome::Commits {
        checked: messages.len(),
        mode,
    })
}

async fn label_pull_request(
    context: &EventContext,
    inputs: &ActionInputs,
    number: u64,
) -> Result<LabelSet> {
    let label_globs = parse_label_config(inputs.raw(LABELS).as_deref().unwrap_or(""))?;
    if label_globs.is_empty() {
        debug!("No labels configured, skipping file listing");
        return Ok(LabelSet::new());
    }

    let token = inputs.require(TOKEN)?;
    let repository = context
        .repository
        .as_ref()
        .context("Repository is unknown: set GITHUB_REPOSITORY or pass --repository")?;
    let client = GitHubClient::new(&context.api_url, &token)?;

    let files = client
        .list_pull_request_files(repository, number)
        .await
        .with_context(|| format!("Failed to list files of pull request #{number}"))?;
    let labels = resolve(&label_globs, &files);

    if labels.is_empty() {
        info!("No labels matched {} changed files", files.len());
    } else {
        let names: Vec<String> = labels.iter().cloned().collect();
        client
            .add_labels(repository, number, &names)
            .await
            .with_context(|| format!("Failed to label pull request #{number}"))?;
    }

    Ok(labels)
}

/// Formats a workflow command that marks the step as failed.
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
