//! Policy and configuration errors.

use std::fmt;

use thiserror::Error;

/// Which piece of text a length or regex rule was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSubject {
    /// Title of a pull request.
    PrTitle,
    /// Body of a pull request.
    PrBody,
    /// First line of a commit message.
    CommitTitle,
}

impl fmt::Display for TextSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSubject::PrTitle => write!(f, "PR title"),
            TextSubject::PrBody => write!(f, "PR body"),
            TextSubject::CommitTitle => write!(f, "Commit title"),
        }
    }
}

/// A single failed conventional-commit rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    /// commitlint-style rule name, e.g. `type-enum`.
    pub rule: &'static str,
    /// Human readable explanation.
    pub explanation: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule, self.explanation)
    }
}

/// Errors raised while loading configuration or validating text.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Label configuration is neither JSON nor YAML, or not a mapping.
    #[error("Unable to parse labels. Found content: \"{raw}\"")]
    ConfigParse {
        /// The raw configuration text.
        raw: String,
    },

    /// A label's globs are neither a string nor a list of strings.
    #[error("Unexpected type for label \"{label}\" (should be string or array of globs)")]
    LabelType {
        /// Offending label name.
        label: String,
    },

    /// A configured regular expression does not compile.
    #[error("Invalid regex \"{pattern}\": {source}")]
    InvalidRegex {
        /// The pattern as configured.
        pattern: String,
        /// Underlying compile error.
        #[source]
        source: regex::Error,
    },

    /// A numeric input is not a base-10 integer.
    #[error("Input \"{input}\" must be a base-10 integer, got \"{value}\"")]
    InvalidNumber {
        /// Input name.
        input: String,
        /// Value supplied.
        value: String,
    },

    /// A required input was not supplied.
    #[error("Input required and not supplied: {name}")]
    MissingInput {
        /// Input name.
        name: String,
    },

    /// The commit header does not follow `type(scope): subject`.
    #[error("Commit message \"{message}\" does not match \"<type>(<scope>): <subject>\"")]
    ConventionalFormat {
        /// The raw commit message.
        message: String,
    },

    /// The header parsed but one or more conventional rules failed.
    #[error(
        "Commit \"{message}\" does not match conventional commit rules: {}",
        join_violations(.violations)
    )]
    ConventionalRules {
        /// The raw commit message.
        message: String,
        /// Every rule that failed, in evaluation order.
        violations: Vec<RuleViolation>,
    },

    /// Text is longer than the configured limit.
    #[error("{subject} \"{title}\" exceeds \"{limit}\" character length")]
    TitleLengthExceeded {
        /// PR title or commit title.
        subject: TextSubject,
        /// The offending text.
        title: String,
        /// Configured maximum in characters.
        limit: usize,
    },

    /// Title does not match the configured regex.
    #[error("{subject} \"{title}\" does not match regex \"{pattern}\"")]
    TitleRegexMismatch {
        /// PR title or commit title.
        subject: TextSubject,
        /// The offending text.
        title: String,
        /// Configured pattern.
        pattern: String,
    },

    /// PR body does not match the configured regex.
    #[error("PR body \"{body}\" does not match regex \"{pattern}\"")]
    BodyRegexMismatch {
        /// The offending body.
        body: String,
        /// Configured pattern.
        pattern: String,
    },

    /// In squash mode, a commit is not shaped like a squash merge.
    #[error("Commit \"{message}\" does not seem to be a Github squash")]
    SquashDetection {
        /// The raw commit message.
        message: String,
    },

    /// The triggering event is not one the engines handle.
    #[error("Unsupported \"{event}\" event.")]
    UnsupportedEvent {
        /// Event name as reported by the host.
        event: String,
    },
}

fn join_violations(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
