//! Report types and serialization.

use anyhow::{Context, Result};
use serde::Serialize;

pub mod report;

pub use report::{CheckReport, CheckedItem, LabelReport, OutputFormat};

/// Serializes data to a YAML string.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    serde_yaml::to_string(data).context("Failed to serialize to YAML")
}

/// Serializes data to pretty-printed JSON.
pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
}

/// Renders a report in a machine-readable format, or `None` for text.
pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Text => Ok(None),
        OutputFormat::Json => to_json(data).map(Some),
        OutputFormat::Yaml => to_yaml(data).map(Some),
    }
}
