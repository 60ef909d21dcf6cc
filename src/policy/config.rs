//! Policy configuration snapshot.

use regex::Regex;

use crate::error::PolicyError;

/// Length and pattern constraints for one kind of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRule {
    /// Maximum length in characters.
    pub max_length: Option<usize>,
    /// Regex the text must contain a match for.
    pub pattern: Option<String>,
}

impl TextRule {
    /// Compiles the pattern, if any.
    pub fn compile(&self) -> Result<CompiledTextRule, PolicyError> {
        Ok(CompiledTextRule {
            max_length: self.max_length,
            pattern: compile_pattern(self.pattern.as_deref())?,
        })
    }
}

/// A [`TextRule`] with its regex compiled.
#[derive(Debug, Clone)]
pub struct CompiledTextRule {
    /// Maximum length in characters.
    pub max_length: Option<usize>,
    /// Compiled pattern.
    pub pattern: Option<Regex>,
}

/// Everything the policy engines need for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Rules for the first line of each commit message.
    pub commit_title: TextRule,
    /// Rules for pull request titles, and for squash-merge title lines.
    pub pr_title: TextRule,
    /// Regex a pull request body must match.
    pub pr_body_pattern: Option<String>,
    /// Whether commits must follow the conventional commit format.
    pub require_conventional: bool,
    /// Branch whose pushes are expected to be squash merges.
    pub squash_branch: Option<String>,
}

/// Compiles an optional user-supplied pattern.
pub fn compile_pattern(pattern: Option<&str>) -> Result<Option<Regex>, PolicyError> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|source| PolicyError::InvalidRegex {
                pattern: p.to_string(),
                source,
            })
        })
        .transpose()
}

/// Parses a numeric input. Empty or whitespace-only values are absent.
pub fn parse_length(input: &str, value: Option<&str>) -> Result<Option<usize>, PolicyError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    value
        .parse::<usize>()
        .map(Some)
        .map_err(|_| PolicyError::InvalidNumber {
            input: input.to_string(),
            value: value.to_string(),
        })
}
