//! Commit message policy over a batch of commits.

use tracing::info;

use super::config::{compile_pattern, CompiledTextRule, PolicyConfig};
use super::conventional::{is_ignored, ConventionalValidator};
use super::squash::decompose;
use super::text::check_text;
use crate::error::{PolicyError, TextSubject};

/// How each commit in a batch is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitMode {
    /// Every commit is validated as written.
    #[default]
    Ordinary,
    /// Every commit must be a squash merge; its PR title and nested commits are validated.
    Squash,
}

impl CommitMode {
    /// Picks squash mode when `branch` is the configured squash branch.
    pub fn for_branch(branch: Option<&str>, squash_branch: Option<&str>) -> Self {
        match (branch, squash_branch) {
            (Some(branch), Some(squash)) if !squash.is_empty() && branch == squash => {
                CommitMode::Squash
            }
            _ => CommitMode::Ordinary,
        }
    }
}

/// Validates `messages` in order, stopping at the first failing commit.
///
/// An empty batch always passes.
pub fn check_commits<S: AsRef<str>>(
    messages: &[S],
    mode: CommitMode,
    config: &PolicyConfig,
) -> Result<(), PolicyError> {
    if messages.is_empty() {
        return Ok(());
    }

    let checker = CommitChecker {
        conventional: config
            .require_conventional
            .then(ConventionalValidator::default),
        title_rule: config.commit_title.compile()?,
    };

    match mode {
        CommitMode::Ordinary => messages
            .iter()
            .try_for_each(|message| checker.check(message.as_ref())),
        CommitMode::Squash => {
            let pr_title_pattern = compile_pattern(config.pr_title.pattern.as_deref())?;
            for message in messages {
                let message = message.as_ref();
                let aggregate = decompose(message).ok_or_else(|| PolicyError::SquashDetection {
                    message: message.to_string(),
                })?;

                check_text(
                    &aggregate.pr_title_line,
                    TextSubject::PrTitle,
                    None,
                    pr_title_pattern.as_ref(),
                )?;
                for nested in &aggregate.nested {
                    checker.check(&nested.title)?;
                }
                info!("Squashed commit OK: \"{message}\"");
            }
            Ok(())
        }
    }
}

struct CommitChecker {
    conventional: Option<ConventionalValidator>,
    title_rule: CompiledTextRule,
}

impl CommitChecker {
    fn check(&self, message: &str) -> Result<(), PolicyError> {
        if let Some(validator) = &self.conventional {
            if is_ignored(message) {
                info!("Commit \"{message}\" is generated by git, skipping conventional checks");
            } else {
                validator.validate(message)?;
            }
        }

        let title = message.lines().next().unwrap_or("");
        check_text(
            title,
            TextSubject::CommitTitle,
            self.title_rule.max_length,
            self.title_rule.pattern.as_ref(),
        )?;
        info!("Commit title OK: \"{title}\"");
        Ok(())
    }
}
