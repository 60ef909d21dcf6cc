//! # pr-guard
//!
//! Pull request labelling and commit message policy for repository event hooks.
//!
//! ## Features
//!
//! - Label pull requests from glob patterns over their changed files
//! - Validate conventional commit messages
//! - Detect squash-merge commits and validate the commits folded into them
//! - Enforce length and regex rules on commit titles and pull request text
//!
//! ## Quick Start
//!
//! ```rust
//! use pr_guard::label::{resolve, LabelGlobs};
//!
//! let mut globs = LabelGlobs::new();
//! globs.insert("docs".to_string(), vec!["**/*.md".to_string()]);
//!
//! let labels = resolve(&globs, &["README.md", "src/lib.rs"]);
//! assert!(labels.contains("docs"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod event;
pub mod git;
pub mod github;
pub mod label;
pub mod policy;

pub use crate::cli::Cli;
pub use crate::error::PolicyError;

/// The current version of pr-guard.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
