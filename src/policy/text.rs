//! Length and regex checks shared by every title and body rule.

use regex::Regex;

use crate::error::{PolicyError, TextSubject};

/// Checks `text` against an optional length limit and an optional pattern.
///
/// Length counts characters, not bytes, and a text exactly `max_length`
/// long passes. The pattern is searched for anywhere in the text. The length
/// check runs first.
pub fn check_text(
    text: &str,
    subject: TextSubject,
    max_length: Option<usize>,
    pattern: Option<&Regex>,
) -> Result<(), PolicyError> {
    if let Some(limit) = max_length {
        if text.chars().count() > limit {
            return Err(PolicyError::TitleLengthExceeded {
                subject,
                title: text.to_string(),
                limit,
            });
        }
    }

    if let Some(regex) = pattern {
        if !regex.is_match(text) {
            return Err(match subject {
                TextSubject::PrBody => PolicyError::BodyRegexMismatch {
                    body: text.to_string(),
                    pattern: regex.as_str().to_string(),
                },
                _ => PolicyError::TitleRegexMismatch {
                    subject,
                    title: text.to_string(),
                    pattern: regex.as_str().to_string(),
                },
            });
        }
    }

    Ok(())
}
