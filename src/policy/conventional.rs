//! Conventional commit parsing and rule checks.
//!
//! The header grammar is `type(scope)!: subject`. Once a header parses, the
//! rules below are all evaluated and every failure is reported together.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};
use tracing::{debug, error, info};

use crate::error::{PolicyError, RuleViolation};

/// Commit types accepted by default.
pub const DEFAULT_TYPES: &[&str] = &[
    "build", "chore", "ci", "config", "docs", "feat", "fix", "perf", "refactor", "revert", "style",
    "test",
];

/// Default maximum length for the header and for each body or footer line.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 100;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)(?:\((?P<scope>[\w$.*/-]*)\))?(?P<breaking>!)?: (?P<subject>\S.*)$")
        .unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static FOOTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:BREAKING[ -]CHANGE: |(?i:signed-off-by|co-authored-by|reviewed-by|acked-by|tested-by|reported-by|helped-by|closes|fixes|resolves|refs)(?:: | #))",
    )
    .unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static BREAKING_FOOTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BREAKING[ -]CHANGE: ").unwrap());

// Messages git writes on its own; these are never held to the format.
#[allow(clippy::unwrap_used)] // Compile-time constant regex patterns
static IGNORED_MESSAGES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"^Merge (?:pull request|branch|tag|remote-tracking branch) ",
        r"^Merge \S+ into \S+",
        r"^[Rr]evert ",
        r"^(?:fixup|squash|amend)! ",
        r"^Automatic merge",
        r"^Auto-merged \S+ into ",
    ])
    .unwrap()
});

/// The structured view of a conventional commit header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConventionalCommit {
    /// Commit type, e.g. `feat`.
    pub commit_type: String,
    /// Optional scope. `Some("")` when written as `type()`.
    pub scope: Option<String>,
    /// Marked with `!` or a `BREAKING CHANGE:` footer.
    pub breaking: bool,
    /// Text after `": "`.
    pub subject: String,
}

impl ParsedConventionalCommit {
    /// Parses a single header line. Returns `None` when the grammar does not match.
    pub fn parse_header(header: &str) -> Option<Self> {
        let captures = HEADER_PATTERN.captures(header)?;
        Some(Self {
            commit_type: captures["type"].to_string(),
            scope: captures.name("scope").map(|m| m.as_str().to_string()),
            breaking: captures.name("breaking").is_some(),
            subject: captures["subject"].to_string(),
        })
    }
}

/// A commit message split into header, body and footer lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSections<'a> {
    /// First line.
    pub header: &'a str,
    /// Lines between the header and the footer.
    pub body: Vec<&'a str>,
    /// Trailer lines, starting at the first `BREAKING CHANGE:` note or known
    /// trailer (`Signed-off-by:`, `Closes #12`, ...). Other `Token:` lines are body.
    pub footer: Vec<&'a str>,
    /// The body is separated from the header by a blank line (or is empty).
    pub body_leading_blank: bool,
    /// The footer is preceded by a blank line (or is empty).
    pub footer_leading_blank: bool,
}

impl<'a> MessageSections<'a> {
    /// Splits a raw commit message.
    pub fn split(message: &'a str) -> Self {
        let mut lines = message.trim_end().lines();
        let header = lines.next().unwrap_or("");
        let rest: Vec<&str> = lines.collect();

        let footer_start = rest
            .iter()
            .position(|line| FOOTER_PATTERN.is_match(line))
            .unwrap_or(rest.len());
        let (body, footer) = rest.split_at(footer_start);

        let body_has_text = body.iter().any(|line| !is_blank(line));
        let body_leading_blank = !body_has_text || body.first().is_some_and(|l| is_blank(l));

        let footer_leading_blank = footer.is_empty()
            || footer_start
                .checked_sub(1)
                .and_then(|i| rest.get(i))
                .is_some_and(|l| is_blank(l));

        Self {
            header,
            body: body.to_vec(),
            footer: footer.to_vec(),
            body_leading_blank,
            footer_leading_blank,
        }
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Returns whether `message` is one git generates itself (merges, reverts, fixups).
pub fn is_ignored(message: &str) -> bool {
    IGNORED_MESSAGES.is_match(message)
}

/// Validates commit messages against the conventional commit rules.
#[derive(Debug, Clone)]
pub struct ConventionalValidator {
    types: Vec<String>,
    max_line_length: usize,
}

impl Default for ConventionalValidator {
    fn default() -> Self {
        Self::new(
            DEFAULT_TYPES.iter().map(ToString::to_string).collect(),
            DEFAULT_MAX_LINE_LENGTH,
        )
    }
}

impl ConventionalValidator {
    /// Creates a validator with a custom type list and line limit.
    pub fn new(types: Vec<String>, max_line_length: usize) -> Self {
        Self {
            types,
            max_line_length,
        }
    }

    /// Validates a full commit message: header grammar first, then every rule.
    pub fn validate(&self, message: &str) -> Result<ParsedConventionalCommit, PolicyError> {
        let sections = MessageSections::split(message);

        let Some(mut parsed) = ParsedConventionalCommit::parse_header(sections.header) else {
            error!(commit = message, "Commit header does not match <type>(<scope>): <subject>");
            return Err(PolicyError::ConventionalFormat {
                message: message.to_string(),
            });
        };

        parsed.breaking |= sections
            .footer
            .iter()
            .any(|line| BREAKING_FOOTER_PATTERN.is_match(line));
        debug!(?parsed, "Parsed conventional commit header");

        let violations = self.check_rules(&parsed, &sections);
        if !violations.is_empty() {
            for violation in &violations {
                error!(commit = message, rule = violation.rule, "{}", violation.explanation);
            }
            return Err(PolicyError::ConventionalRules {
                message: message.to_string(),
                violations,
            });
        }

        info!("Commit \"{message}\" complies with conventional commit rules");
        Ok(parsed)
    }

    fn check_rules(
        &self,
        parsed: &ParsedConventionalCommit,
        sections: &MessageSections<'_>,
    ) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        let mut fail = |rule: &'static str, explanation: String| {
            violations.push(RuleViolation { rule, explanation });
        };

        if !self.types.iter().any(|t| *t == parsed.commit_type) {
            fail(
                "type-enum",
                format!(
                    "type \"{}\" must be one of [{}]",
                    parsed.commit_type,
                    self.types.join(", ")
                ),
            );
        }
        if parsed.commit_type != parsed.commit_type.to_lowercase() {
            fail("type-case", "type must be lower-case".to_string());
        }

        match parsed.scope.as_deref() {
            Some("") => fail(
                "scope-empty",
                "scope may not be empty when parentheses are present".to_string(),
            ),
            Some(scope) if scope != scope.to_lowercase() => {
                fail("scope-case", format!("scope \"{scope}\" must be lower-case"));
            }
            _ => {}
        }

        if parsed.subject.chars().next().is_some_and(char::is_uppercase) {
            fail(
                "subject-case",
                "subject must not be sentence-case, start-case, pascal-case or upper-case"
                    .to_string(),
            );
        }
        if parsed.subject.ends_with('.') {
            fail("subject-full-stop", "subject may not end with \".\"".to_string());
        }

        let header_length = sections.header.chars().count();
        if header_length > self.max_line_length {
            fail(
                "header-max-length",
                format!(
                    "header must not be longer than {} characters, current length is {header_length}",
                    self.max_line_length
                ),
            );
        }

        if !sections.body_leading_blank {
            fail("body-leading-blank", "body must have leading blank line".to_string());
        }
        if let Some(length) = self.longest_line_over_limit(&sections.body) {
            fail(
                "body-max-line-length",
                format!(
                    "body's lines must not be longer than {} characters, found {length}",
                    self.max_line_length
                ),
            );
        }

        if !sections.footer_leading_blank {
            fail("footer-leading-blank", "footer must have leading blank line".to_string());
        }
        if let Some(length) = self.longest_line_over_limit(&sections.footer) {
            fail(
                "footer-max-line-length",
                format!(
                    "footer's lines must not be longer than {} characters, found {length}",
                    self.max_line_length
                ),
            );
        }

        violations
    }

    fn longest_line_over_limit(&self, lines: &[&str]) -> Option<usize> {
        lines
            .iter()
            .map(|line| line.chars().count())
            .filter(|&length| length > self.max_line_length)
            .max()
    }
}

/// Validates `message` with the default rule set.
pub fn validate_conventional(message: &str) -> Result<ParsedConventionalCommit, PolicyError> {
    ConventionalValidator::default().validate(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn rules_of(err: PolicyError) -> Vec<&'static str> {
        match err {
            PolicyError::ConventionalRules { violations, .. } => {
                violations.into_iter().map(|v| v.rule).collect()
            }
            other => panic!("expected rule violations, got {other:?}"),
        }
    }

    // ── header grammar ───────────────────────────────────────────────

    #[test]
    fn parses_type_scope_subject() {
        let parsed = ParsedConventionalCommit::parse_header("fix(compile): something").unwrap();
        assert_eq!(parsed.commit_type, "fix");
        assert_eq!(parsed.scope.as_deref(), Some("compile"));
        assert!(!parsed.breaking);
        assert_eq!(parsed.subject, "something");
    }

    #[test]
    fn parses_breaking_marker() {
        let parsed = ParsedConventionalCommit::parse_header("fix($compile)!: something").unwrap();
        assert!(parsed.breaking);
        assert_eq!(parsed.scope.as_deref(), Some("$compile"));
    }

    #[test]
    fn empty_parentheses_still_parse() {
        let parsed = ParsedConventionalCommit::parse_header("fix(): something").unwrap();
        assert_eq!(parsed.scope.as_deref(), Some(""));
    }

    #[test]
    fn rejects_malformed_headers() {
        for header in [
            "fix; something",
            "Just a normal commit",
            "bad commit",
            "fix:something",
            "fix:  two spaces",
            "fix: ",
            "(scope): no type",
            "",
        ] {
            assert!(
                ParsedConventionalCommit::parse_header(header).is_none(),
                "{header:?} should not parse"
            );
        }
    }

    // ── validation ───────────────────────────────────────────────────

    #[test]
    fn accepts_conventional_messages() {
        for message in [
            "fix(compile): something",
            "feat(location): something",
            "docs(filter): something",
            "style(http): something",
            "test(resource): something",
            "chore(controller): something",
            "chore($foo-bar): something",
            "chore(*): something",
            "chore(guide/location): something",
            "revert(foo): something",
            "fix: blablabla",
            "fix($compile)!: something",
            "config(auth): set values for staging and production",
        ] {
            assert!(
                validate_conventional(message).is_ok(),
                "{message:?} should be valid"
            );
        }
    }

    #[test]
    fn wrong_format_is_a_format_error() {
        for message in ["fix; something", "Just a normal commit", "bad commit"] {
            let err = validate_conventional(message).unwrap_err();
            assert!(
                matches!(err, PolicyError::ConventionalFormat { message: ref m } if m == message)
            );
        }
    }

    #[test]
    fn empty_scope_is_a_rule_violation() {
        let err = validate_conventional("fix(): something").unwrap_err();
        assert_eq!(rules_of(err), vec!["scope-empty"]);
    }

    #[test]
    fn unknown_type() {
        let err = validate_conventional("feature: add login").unwrap_err();
        assert_eq!(rules_of(err), vec!["type-enum"]);
    }

    #[test]
    fn collects_every_violation() {
        let err = validate_conventional("Feat(Auth): Add login.").unwrap_err();
        assert_eq!(
            rules_of(err),
            vec![
                "type-enum",
                "type-case",
                "scope-case",
                "subject-case",
                "subject-full-stop"
            ]
        );
    }

    #[test]
    fn camel_case_scope_is_rejected() {
        let err = validate_conventional("refactor(httpBackend): something").unwrap_err();
        assert_eq!(rules_of(err), vec!["scope-case"]);
    }

    #[test]
    fn subject_starting_with_digit_is_fine() {
        assert!(validate_conventional("chore: 2 more retries").is_ok());
    }

    #[test]
    fn header_length_limit() {
        let header = format!("feat: {}", "a".repeat(94));
        assert_eq!(header.chars().count(), 100);
        assert!(validate_conventional(&header).is_ok());

        let header = format!("feat: {}", "a".repeat(95));
        assert_eq!(
            rules_of(validate_conventional(&header).unwrap_err()),
            vec!["header-max-length"]
        );
    }

    #[test]
    fn body_requires_leading_blank_line() {
        let err = validate_conventional("feat: add login\nbody text").unwrap_err();
        assert_eq!(rules_of(err), vec!["body-leading-blank"]);
        assert!(validate_conventional("feat: add login\n\nbody text").is_ok());
    }

    #[test]
    fn body_line_length_is_per_line() {
        let message = format!("feat: add login\n\n{}\n{}", "b".repeat(100), "c".repeat(100));
        assert!(validate_conventional(&message).is_ok());

        let message = format!("feat: add login\n\n{}", "b".repeat(101));
        assert_eq!(
            rules_of(validate_conventional(&message).unwrap_err()),
            vec!["body-max-line-length"]
        );
    }

    #[test]
    fn footer_requires_leading_blank_line() {
        let message = "feat: add login\n\nbody\nSigned-off-by: Dev <dev@example.com>";
        assert_eq!(
            rules_of(validate_conventional(message).unwrap_err()),
            vec!["footer-leading-blank"]
        );

        let message = "feat: add login\n\nbody\n\nSigned-off-by: Dev <dev@example.com>";
        assert!(validate_conventional(message).is_ok());
    }

    #[test]
    fn hyphenated_body_lines_are_not_trailers() {
        for message in [
            "feat: add retries\n\nRetries help flaky calls.\nRe-run: tests now pass",
            "fix: flaky upload\n\nSee the notes.\nFollow-up: split the client\ne-mail: ops@example.com",
        ] {
            assert!(
                validate_conventional(message).is_ok(),
                "{message:?} should be valid"
            );
            assert!(MessageSections::split(message).footer.is_empty());
        }
    }

    #[test]
    fn trailer_tokens_ignore_case() {
        let sections =
            MessageSections::split("feat: x\n\nbody\n\nCo-Authored-By: Dev <dev@example.com>");
        assert_eq!(sections.footer, vec!["Co-Authored-By: Dev <dev@example.com>"]);
    }

    #[test]
    fn footer_line_length() {
        let message = format!("fix: crash\n\nCloses #12 {}", "x".repeat(100));
        assert_eq!(
            rules_of(validate_conventional(&message).unwrap_err()),
            vec!["footer-max-line-length"]
        );
    }

    #[test]
    fn breaking_change_footer_marks_breaking() -> anyhow::Result<()> {
        let parsed =
            validate_conventional("feat(api): drop v1\n\nBREAKING CHANGE: v1 endpoints are gone")?;
        assert!(parsed.breaking);
        Ok(())
    }

    #[test]
    fn trailing_newlines_are_ignored() -> anyhow::Result<()> {
        let parsed = validate_conventional("fix: blablabla\n\n\n")?;
        assert_eq!(parsed.subject, "blablabla");
        Ok(())
    }

    #[test]
    fn custom_type_list() {
        let validator = ConventionalValidator::new(vec!["wip".to_string()], 20);
        assert!(validator.validate("wip: draft").is_ok());
        assert!(validator.validate("feat: draft").is_err());
        assert!(validator.validate("wip: this header is far too long").is_err());
    }

    // ── sections ─────────────────────────────────────────────────────

    #[test]
    fn splits_body_and_footer() {
        let sections = MessageSections::split(
            "feat: x\n\nfirst\nsecond\n\nReviewed-by: Z\nRefs #133",
        );
        assert_eq!(sections.header, "feat: x");
        assert_eq!(sections.body, vec!["", "first", "second", ""]);
        assert_eq!(sections.footer, vec!["Reviewed-by: Z", "Refs #133"]);
        assert!(sections.body_leading_blank);
        assert!(sections.footer_leading_blank);
    }

    #[test]
    fn header_only_message_has_no_sections() {
        let sections = MessageSections::split("feat: x");
        assert!(sections.body.is_empty());
        assert!(sections.footer.is_empty());
        assert!(sections.body_leading_blank);
        assert!(sections.footer_leading_blank);
    }

    // ── ignored messages ─────────────────────────────────────────────

    #[test]
    fn git_generated_messages_are_ignored() {
        assert!(is_ignored("Merge pull request #12 from org/branch"));
        assert!(is_ignored("Merge branch 'main' into feature"));
        assert!(is_ignored("Revert \"feat: add login\""));
        assert!(is_ignored("fixup! feat: add login"));
        assert!(!is_ignored("revert(foo): something"));
        assert!(!is_ignored("feat: merge branch handling"));
    }
}
