//! Git repository operations

use anyhow::{Context, Result};
use git2::{Commit, Repository, Sort};
use tracing::debug;

use crate::git::SHORT_HASH_LEN;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

/// A commit's identity and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    /// Full commit hash
    pub hash: String,
    /// Message with trailing whitespace removed
    pub message: String,
}

impl CommitMessage {
    fn from_git_commit(commit: &Commit) -> Self {
        Self {
            hash: commit.id().to_string(),
            message: commit.message().unwrap_or("").trim_end().to_string(),
        }
    }

    /// Abbreviated commit hash
    pub fn short_hash(&self) -> &str {
        &self.hash[..SHORT_HASH_LEN.min(self.hash.len())]
    }
}

impl GitRepository {
    /// Open repository at specified path
    pub fn open_at<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Get current branch name
    pub fn get_current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD reference")?;

        if let Some(name) = head.shorthand() {
            if name != "HEAD" {
                return Ok(name.to_string());
            }
        }

        anyhow::bail!("Repository is in detached HEAD state")
    }

    /// Read commit messages for a revision or `start..end` range, oldest first.
    ///
    /// Merge commits inside a range are skipped.
    pub fn commit_messages_in_range(&self, range: &str) -> Result<Vec<CommitMessage>> {
        let Some((start_spec, end_spec)) = range.split_once("..") else {
            let commit = self.peel_commit(range)?;
            return Ok(vec![CommitMessage::from_git_commit(&commit)]);
        };

        if end_spec.contains("..") {
            anyhow::bail!("Invalid range format: {}", range);
        }
        let end_spec = if end_spec.is_empty() { "HEAD" } else { end_spec };

        let start_commit = self.peel_commit(start_spec)?;
        let end_commit = self.peel_commit(end_spec)?;

        // Walk from start_commit (exclusive) to end_commit, parents first
        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker
            .set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)
            .context("Failed to sort revwalk")?;
        walker
            .push(end_commit.id())
            .context("Failed to push end commit")?;
        walker
            .hide(start_commit.id())
            .context("Failed to hide start commit")?;

        let mut commits = Vec::new();
        for oid in walker {
            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = self
                .repo
                .find_commit(oid)
                .context("Failed to find commit")?;

            if commit.parent_count() > 1 {
                debug!(commit = %oid, "Skipping merge commit");
                continue;
            }

            commits.push(CommitMessage::from_git_commit(&commit));
        }

        debug!(range, count = commits.len(), "Read commits in range");
        Ok(commits)
    }

    fn peel_commit(&self, spec: &str) -> Result<Commit<'_>> {
        self.repo
            .revparse_single(spec)
            .with_context(|| format!("Failed to parse commit: {}", spec))?
            .peel_to_commit()
            .with_context(|| format!("Failed to peel object to commit: {}", spec))
    }
}
