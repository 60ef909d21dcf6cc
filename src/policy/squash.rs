//! Detection and decomposition of platform squash-merge commit messages.
//!
//! A squash merge title ends in `(#<number>)` and is followed, after one or
//! more newlines, by the folded commits as `* ` bullets. Text between
//! bullets belongs to the preceding bullet's body. CRLF line endings are
//! accepted and nested commits come back with LF endings.
//!
//! A nested commit starts only at a line beginning with `* `. A `* ` inside
//! a line (`a * b`) stays in the current body rather than opening a new
//! commit, unlike a plain split on every `"* "`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SQUASH_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A(?P<title>[^\r\n]* \(#(?P<number>[0-9]+)\))(?:\r?\n)+\* ").unwrap()
});

const BULLET: &str = "* ";

/// One of the commits folded into a squash merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedCommit {
    /// The bullet line without its `* ` marker.
    pub title: String,
    /// Lines up to the next bullet, with surrounding blank lines removed.
    pub body: String,
}

impl NestedCommit {
    /// Rebuilds the commit message as title, blank line, body.
    pub fn message(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n\n{}", self.title, self.body)
        }
    }
}

/// A squash-merge message split into the pull request title and its commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquashAggregate {
    /// The first line, including the trailing `(#<number>)`.
    pub pr_title_line: String,
    /// Pull request number from the title line.
    pub pr_number: u64,
    /// Folded commits in the order they appear.
    pub nested: Vec<NestedCommit>,
}

impl SquashAggregate {
    /// Titles of the nested commits, in order.
    pub fn titles(&self) -> Vec<&str> {
        self.nested.iter().map(|c| c.title.as_str()).collect()
    }
}

/// Splits `message` if it has the squash-merge shape.
///
/// Returns `None` for anything else, including a matching title with no bullets.
pub fn decompose(message: &str) -> Option<SquashAggregate> {
    let captures = SQUASH_HEADER_PATTERN.captures(message)?;
    let title = captures.name("title")?;
    let pr_number = match captures["number"].parse::<u64>() {
        Ok(n) => n,
        Err(e) => {
            debug!(error = %e, "Squash title has an unusable PR number");
            return None;
        }
    };

    let mut nested: Vec<NestedCommit> = Vec::new();
    let mut body_lines: Vec<&str> = Vec::new();

    for line in message[title.end()..].lines() {
        if let Some(bullet) = line.strip_prefix(BULLET) {
            if let Some(last) = nested.last_mut() {
                last.body = join_body(&body_lines);
            }
            body_lines.clear();
            nested.push(NestedCommit {
                title: bullet.to_string(),
                body: String::new(),
            });
        } else {
            body_lines.push(line);
        }
    }
    if let Some(last) = nested.last_mut() {
        last.body = join_body(&body_lines);
    }

    if nested.is_empty() {
        return None;
    }

    debug!(
        pr_number,
        nested = nested.len(),
        "Decomposed squash merge message"
    );

    Some(SquashAggregate {
        pr_title_line: title.as_str().to_string(),
        pr_number,
        nested,
    })
}

fn join_body(lines: &[&str]) -> String {
    lines.join("\n").trim_matches('\n').to_string()
}
