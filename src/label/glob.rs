//! Glob pattern compilation and path matching.
//!
//! Patterns use the usual path glob language: `*` and `?` stay within a
//! single path segment, `**` spans zero or more segments, and `[...]` is a
//! character class. A malformed pattern never matches anything; it is logged
//! and skipped rather than reported as an error.

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};

/// A glob compiled once and reusable against many paths.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    pattern: String,
    matcher: Option<GlobMatcher>,
}

impl GlobPattern {
    /// Compiles `pattern`. Compilation failures produce a pattern that matches nothing.
    pub fn new(pattern: &str) -> Self {
        let matcher = match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(e) => {
                warn!(pattern, error = %e, "Malformed glob will never match");
                None
            }
        };

        Self {
            pattern: pattern.to_string(),
            matcher,
        }
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns whether the pattern compiled.
    pub fn is_valid(&self) -> bool {
        self.matcher.is_some()
    }

    /// Tests a single slash-separated path.
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(path))
    }

    /// Returns the first path in `paths` that matches, if any.
    pub fn first_match<'a, S: AsRef<str>>(&self, paths: &'a [S]) -> Option<&'a str> {
        debug!(pattern = %self.pattern, "Checking pattern");
        paths.iter().map(AsRef::as_ref).find(|path| {
            let hit = self.is_match(path);
            debug!(path, hit, "Tested changed file");
            hit
        })
    }
}

/// Tests `path` against `pattern` in one step.
pub fn matches(pattern: &str, path: &str) -> bool {
    GlobPattern::new(pattern).is_match(path)
}
