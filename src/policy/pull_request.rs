//! Pull request title and body policy.

use tracing::info;

use super::config::{compile_pattern, PolicyConfig};
use super::text::check_text;
use crate::error::{PolicyError, TextSubject};

/// The text fields of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestText {
    /// Pull request title.
    pub title: Option<String>,
    /// Pull request description.
    pub body: Option<String>,
}

/// Validates a pull request body, then its title.
///
/// `None` means the triggering event carried no pull request, which passes.
/// Empty titles and bodies are skipped.
pub fn check_pull_request(
    pr: Option<&PullRequestText>,
    config: &PolicyConfig,
) -> Result<(), PolicyError> {
    let Some(pr) = pr else {
        return Ok(());
    };

    let body_pattern = compile_pattern(config.pr_body_pattern.as_deref())?;
    let title_rule = config.pr_title.compile()?;

    if let (Some(pattern), Some(body)) = (&body_pattern, non_empty(&pr.body)) {
        check_text(body, TextSubject::PrBody, None, Some(pattern))?;
        info!("PR body OK: \"{body}\"");
    }

    if let Some(title) = non_empty(&pr.title) {
        check_text(
            title,
            TextSubject::PrTitle,
            title_rule.max_length,
            title_rule.pattern.as_ref(),
        )?;
        info!("PR title OK: \"{title}\"");
    }

    Ok(())
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}
