//! Check command: validates commit messages and pull request text locally.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::ActionInputs;
use crate::data::{render, CheckReport, CheckedItem, OutputFormat};
use crate::git::GitRepository;
use crate::policy::{check_commits, check_pull_request, CommitMode, PolicyConfig, PullRequestText};

/// Check command options.
#[derive(Parser)]
pub struct CheckCommand {
    /// Check subcommand to execute.
    #[command(subcommand)]
    pub command: CheckSubcommands,
}

/// Check subcommands.
#[derive(Subcommand)]
pub enum CheckSubcommands {
    /// Checks commit messages from a repository range or the command line.
    Commits(CommitsCommand),
    /// Checks a pull request title and body.
    Pr(PrCommand),
}

/// Policy flags. Unset flags fall back to the `INPUT_*` environment.
#[derive(Args, Default)]
pub struct PolicyArgs {
    /// Maximum commit title length.
    #[arg(long, value_name = "N")]
    pub commit_title_length: Option<usize>,

    /// Regex every commit title must match.
    #[arg(long, value_name = "REGEX")]
    pub commit_title_regex: Option<String>,

    /// Requires conventional commit messages.
    #[arg(long)]
    pub conventional: bool,

    /// Maximum pull request title length.
    #[arg(long, value_name = "N")]
    pub pr_title_length: Option<usize>,

    /// Regex pull request titles and squash titles must match.
    #[arg(long, value_name = "REGEX")]
    pub pr_title_regex: Option<String>,

    /// Regex pull request bodies must match.
    #[arg(long, value_name = "REGEX")]
    pub pr_body_regex: Option<String>,

    /// Branch whose commits are squash merges.
    #[arg(long, value_name = "BRANCH")]
    pub squash_branch: Option<String>,
}

impl PolicyArgs {
    /// Layers the flags over a base configuration.
    pub fn apply(self, mut config: PolicyConfig) -> PolicyConfig {
        if self.commit_title_length.is_some() {
            config.commit_title.max_length = self.commit_title_length;
        }
        if self.commit_title_regex.is_some() {
            config.commit_title.pattern = self.commit_title_regex;
        }
        if self.pr_title_length.is_some() {
            config.pr_title.max_length = self.pr_title_length;
        }
        if self.pr_title_regex.is_some() {
            config.pr_title.pattern = self.pr_title_regex;
        }
        if self.pr_body_regex.is_some() {
            config.pr_body_pattern = self.pr_body_regex;
        }
        if self.squash_branch.is_some() {
            config.squash_branch = self.squash_branch;
        }
        config.require_conventional |= self.conventional;
        config
    }

    fn resolve(self) -> Result<PolicyConfig> {
        let base = ActionInputs::from_env()
            .policy_config()
            .context("Failed to read policy inputs")?;
        Ok(self.apply(base))
    }
}

/// Commits subcommand options.
#[derive(Parser)]
pub struct CommitsCommand {
    /// Commit range to check (e.g., HEAD~3..HEAD). Defaults to HEAD.
    #[arg(value_name = "COMMIT_RANGE", conflicts_with = "message")]
    pub commit_range: Option<String>,

    /// Message to check instead of reading a repository. Repeatable.
    #[arg(long, short = 'm')]
    pub message: Vec<String>,

    /// Repository to read commits from.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Branch used to pick squash mode (defaults to the current branch).
    #[arg(long)]
    pub branch: Option<String>,

    /// Policy flags.
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Pr subcommand options.
#[derive(Parser)]
pub struct PrCommand {
    /// Pull request title.
    #[arg(long)]
    pub title: Option<String>,

    /// Pull request body.
    #[arg(long)]
    pub body: Option<String>,

    /// Policy flags.
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

impl CheckCommand {
    /// Executes the check command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            CheckSubcommands::Commits(commits_cmd) => commits_cmd.execute(),
            CheckSubcommands::Pr(pr_cmd) => pr_cmd.execute(),
        }
    }
}

impl CommitsCommand {
    /// Executes the commits subcommand.
    pub fn execute(self) -> Result<()> {
        let config = self.policy.resolve()?;

        let (items, messages, branch) = if self.message.is_empty() {
            let repo = GitRepository::open_at(&self.repo)?;
            let range = self.commit_range.as_deref().unwrap_or("HEAD");
            let commits = repo
                .commit_messages_in_range(range)
                .with_context(|| format!("Failed to read commits in {range}"))?;
            let branch = match self.branch {
                Some(branch) => Some(branch),
                None => repo.get_current_branch().ok(),
            };
            let items = commits
                .iter()
                .map(|c| CheckedItem {
                    kind: "commit".to_string(),
                    hash: Some(c.short_hash().to_string()),
                    summary: first_line(&c.message),
                })
                .collect();
            let messages = commits.into_iter().map(|c| c.message).collect();
            (items, messages, branch)
        } else {
            let items = self
                .message
                .iter()
                .map(|m| CheckedItem {
                    kind: "commit".to_string(),
                    hash: None,
                    summary: first_line(m),
                })
                .collect();
            (items, self.message, self.branch)
        };

        let mode = CommitMode::for_branch(branch.as_deref(), config.squash_branch.as_deref());
        let report = CheckReport::new(items, check_commits(&messages, mode, &config));
        output_report(&report, self.format)
    }
}

impl PrCommand {
    /// Executes the pr subcommand.
    pub fn execute(self) -> Result<()> {
        let config = self.policy.resolve()?;

        let mut items = Vec::new();
        if let Some(title) = &self.title {
            items.push(CheckedItem {
                kind: "pr_title".to_string(),
                hash: None,
                summary: first_line(title),
            });
        }
        if let Some(body) = &self.body {
            items.push(CheckedItem {
                kind: "pr_body".to_string(),
                hash: None,
                summary: first_line(body),
            });
        }

        let pr = PullRequestText {
            title: self.title,
            body: self.body,
        };
        let report = CheckReport::new(items, check_pull_request(Some(&pr), &config));
        output_report(&report, self.format)
    }
}

/// Prints the report and fails when any check failed.
fn output_report(report: &CheckReport, format: OutputFormat) -> Result<()> {
    match render(report, format)? {
        Some(output) => println!("{output}"),
        None => print!("{}", format_text_report(report)),
    }

    match &report.error {
        Some(error) => anyhow::bail!("Check failed: {error}"),
        None => Ok(()),
    }
}

fn format_text_report(report: &CheckReport) -> String {
    let mut text = String::new();
    for item in &report.items {
        let label = match &item.hash {
            Some(hash) => format!("{hash} {}", item.summary),
            None => format!("{} {}", item.kind, item.summary),
        };
        text.push_str(&format!("  {label}\n"));
    }
    match &report.error {
        Some(error) => text.push_str(&format!("❌ {error}\n")),
        None => text.push_str(&format!("✅ {} item(s) passed\n", report.items.len())),
    }
    text
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or("").to_string()
}
