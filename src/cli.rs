//! CLI interface for pr-guard.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod check;
pub mod label;
pub mod run;

/// pr-guard: labels pull requests and enforces commit and PR text policy.
#[derive(Parser)]
#[command(name = "pr-guard")]
#[command(
    about = "Labels pull requests and enforces commit and PR text policy",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Handles the triggering repository event, as a workflow step.
    Run(run::RunCommand),
    /// Resolves labels for a list of changed paths.
    Label(label::LabelCommand),
    /// Checks commit messages or pull request text locally.
    Check(check::CheckCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(run_cmd) => run_cmd.execute().await,
            Commands::Label(label_cmd) => label_cmd.execute(),
            Commands::Check(check_cmd) => check_cmd.execute(),
        }
    }
}
