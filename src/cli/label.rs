//! Label command: resolves labels for changed paths.

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::parse_label_config;
use crate::data::{render, LabelReport, OutputFormat};
use crate::label::resolve;

/// Label command options.
#[derive(Parser)]
pub struct LabelCommand {
    /// Label configuration file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Changed paths. Read from stdin, one per line, when omitted.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Output format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

impl LabelCommand {
    /// Executes the label command.
    pub fn execute(self) -> Result<()> {
        let raw = fs::read_to_string(&self.config).with_context(|| {
            format!("Failed to read label config: {}", self.config.display())
        })?;
        let label_globs = parse_label_config(&raw)?;

        let paths = if self.paths.is_empty() {
            read_paths(io::stdin().lock())?
        } else {
            self.paths
        };

        let labels = resolve(&label_globs, &paths);
        let report = LabelReport::new(paths.len(), &labels);

        match render(&report, self.format)? {
            Some(output) => println!("{output}"),
            None => {
                for label in &report.labels {
                    println!("{label}");
                }
            }
        }
        Ok(())
    }
}

fn read_paths<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read paths from stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            paths.push(line.to_string());
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_non_blank_lines() -> anyhow::Result<()> {
        let input = "docs/a.md\n\n  src/lib.rs  \n";
        assert_eq!(read_paths(input.as_bytes())?, vec!["docs/a.md", "src/lib.rs"]);
        Ok(())
    }
}
