//! Reports produced by the local commands.

use std::fmt;

use serde::Serialize;

use crate::label::LabelSet;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(format!("unknown output format \"{other}\" (expected text, json or yaml)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Labels resolved for a set of paths.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LabelReport {
    /// Number of paths examined.
    pub paths: usize,
    /// Resolved labels, sorted.
    pub labels: Vec<String>,
}

impl LabelReport {
    /// Builds a report from a resolved label set.
    pub fn new(paths: usize, labels: &LabelSet) -> Self {
        Self {
            paths,
            labels: labels.iter().cloned().collect(),
        }
    }
}

/// One piece of text that was validated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckedItem {
    /// What the text is, e.g. `commit` or `pr_title`.
    pub kind: String,
    /// Commit hash, for commits read from a repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// First line of the text.
    pub summary: String,
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckReport {
    /// Whether every item passed.
    pub passes: bool,
    /// Items submitted for checking, in order.
    pub items: Vec<CheckedItem>,
    /// The first failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckReport {
    /// Builds a report from the checked items and the check result.
    pub fn new<E: fmt::Display>(items: Vec<CheckedItem>, result: Result<(), E>) -> Self {
        let error = result.err().map(|e| e.to_string());
        Self {
            passes: error.is_none(),
            items,
            error,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::data::{render, to_json};

    #[test]
    fn output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("yaml".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert_eq!(OutputFormat::default().to_string(), "text");
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn check_report_json() -> anyhow::Result<()> {
        let report = CheckReport::new(
            vec![CheckedItem {
                kind: "commit".to_string(),
                hash: None,
                summary: "bad commit".to_string(),
            }],
            Err("Commit message \"bad commit\" does not match \"<type>(<scope>): <subject>\""),
        );
        assert!(!report.passes);
        insta::assert_snapshot!(to_json(&report)?, @r#"
        {
          "passes": false,
          "items": [
            {
              "kind": "commit",
              "summary": "bad commit"
            }
          ],
          "error": "Commit message \"bad commit\" does not match \"<type>(<scope>): <subject>\""
        }
        "#);
        Ok(())
    }

    #[test]
    fn label_report_yaml() -> anyhow::Result<()> {
        let labels: LabelSet = ["docs".to_string(), "ci".to_string()].into_iter().collect();
        let report = LabelReport::new(3, &labels);
        let yaml = render(&report, OutputFormat::Yaml)?.unwrap_or_default();
        assert_eq!(yaml, "paths: 3\nlabels:\n- ci\n- docs\n");
        assert_eq!(render(&report, OutputFormat::Text)?, None);
        Ok(())
    }
}
