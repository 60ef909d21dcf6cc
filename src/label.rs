//! Pull request labelling from changed-file globs.

pub mod glob;
pub mod resolver;

pub use glob::{matches, GlobPattern};
pub use resolver::{resolve, LabelGlobs, LabelResolver, LabelSet};
