//! Label configuration loading.
//!
//! The configuration maps each label to a glob or a list of globs. It is
//! accepted as JSON first and, failing that, as YAML.

use serde_json::Value;
use tracing::debug;

use crate::error::PolicyError;
use crate::label::LabelGlobs;

/// Parses a raw label configuration string.
///
/// Empty or null input yields no labels.
pub fn parse_label_config(raw: &str) -> Result<LabelGlobs, PolicyError> {
    debug!("Parsing raw labels config '{raw}'...");

    if raw.trim().is_empty() {
        return Ok(LabelGlobs::new());
    }

    let entries = match parse_document(raw)? {
        Value::Null => return Ok(LabelGlobs::new()),
        Value::Object(entries) => entries,
        other => {
            debug!(document = %other, "Labels config is not a mapping");
            return Err(PolicyError::ConfigParse {
                raw: raw.to_string(),
            });
        }
    };

    let label_globs = entries
        .into_iter()
        .map(|(label, globs)| {
            let globs = globs_of(&label, globs)?;
            Ok((label, globs))
        })
        .collect::<Result<LabelGlobs, PolicyError>>()?;

    debug!(labels = label_globs.len(), "Loaded label globs");
    Ok(label_globs)
}

/// Reads the document as JSON, falling back to YAML.
fn parse_document(raw: &str) -> Result<Value, PolicyError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(document) => {
            debug!("Loaded labels as JSON");
            Ok(document)
        }
        Err(json_error) => {
            debug!(error = %json_error, "Labels are not JSON, trying YAML");
            serde_yaml::from_str::<serde_yaml::Value>(raw)
                .map_err(|e| e.to_string())
                .and_then(|yaml| serde_json::to_value(yaml).map_err(|e| e.to_string()))
                .map_err(|yaml_error| {
                    debug!(error = %yaml_error, "Labels are not YAML either");
                    PolicyError::ConfigParse {
                        raw: raw.to_string(),
                    }
                })
        }
    }
}

/// Accepts a single glob string or a list of glob strings.
fn globs_of(label: &str, globs: Value) -> Result<Vec<String>, PolicyError> {
    let wrong_type = || PolicyError::LabelType {
        label: label.to_string(),
    };

    match globs {
        Value::String(glob) => Ok(vec![glob]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(glob) => Ok(glob),
                _ => Err(wrong_type()),
            })
            .collect(),
        _ => Err(wrong_type()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn json_config_with_string_and_list() -> anyhow::Result<()> {
        let globs = parse_label_config(r#"{ "myLabel1": ["glob1", "glob2"], "myLabel2": "glob" }"#)?;
        assert_eq!(globs["myLabel1"], vec!["glob1", "glob2"]);
        assert_eq!(globs["myLabel2"], vec!["glob"]);
        Ok(())
    }

    #[test]
    fn yaml_fallback() -> anyhow::Result<()> {
        let globs = parse_label_config("mylabel: myglob")?;
        assert_eq!(globs["mylabel"], vec!["myglob"]);

        let globs = parse_label_config("docs:\n  - '**/*.md'\n  - 'docs/**'\nci: '.github/**'\n")?;
        assert_eq!(globs["docs"], vec!["**/*.md", "docs/**"]);
        assert_eq!(globs["ci"], vec![".github/**"]);
        Ok(())
    }

    #[test]
    fn unparseable_config() {
        let err = parse_label_config("[unclosed").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to parse labels. Found content: \"[unclosed\""
        );
    }

    #[test]
    fn non_mapping_config() {
        assert!(matches!(
            parse_label_config("just a string").unwrap_err(),
            PolicyError::ConfigParse { .. }
        ));
        assert!(matches!(
            parse_label_config(r#"["a", "b"]"#).unwrap_err(),
            PolicyError::ConfigParse { .. }
        ));
    }

    #[test]
    fn wrong_glob_type() {
        let err = parse_label_config("mylabel: 3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected type for label \"mylabel\" (should be string or array of globs)"
        );
        assert!(matches!(
            parse_label_config(r#"{"mylabel": [1, 2]}"#).unwrap_err(),
            PolicyError::LabelType { .. }
        ));
    }

    #[test]
    fn empty_config_has_no_labels() -> anyhow::Result<()> {
        assert!(parse_label_config("")?.is_empty());
        assert!(parse_label_config("   \n")?.is_empty());
        assert!(parse_label_config("null")?.is_empty());
        assert!(parse_label_config("{}")?.is_empty());
        Ok(())
    }
}
