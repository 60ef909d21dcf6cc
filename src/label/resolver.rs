//! Label discovery from changed file paths.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::glob::GlobPattern;

/// Label name to the globs that select it.
pub type LabelGlobs = BTreeMap<String, Vec<String>>;

/// Labels to apply to a pull request.
pub type LabelSet = BTreeSet<String>;

/// Resolves labels from changed paths using precompiled globs.
#[derive(Debug, Clone, Default)]
pub struct LabelResolver {
    rules: Vec<(String, Vec<GlobPattern>)>,
}

impl LabelResolver {
    /// Compiles every glob in `label_globs`.
    pub fn new(label_globs: &LabelGlobs) -> Self {
        let rules = label_globs
            .iter()
            .map(|(label, globs)| {
                let patterns = globs.iter().map(|g| GlobPattern::new(g)).collect();
                (label.clone(), patterns)
            })
            .collect();

        Self { rules }
    }

    /// Returns every label with at least one glob matching at least one path.
    pub fn resolve<S: AsRef<str>>(&self, changed_paths: &[S]) -> LabelSet {
        let mut labels = LabelSet::new();

        if changed_paths.is_empty() {
            return labels;
        }

        for (label, patterns) in &self.rules {
            debug!(label = %label, "Processing label");
            if let Some((pattern, path)) = patterns
                .iter()
                .find_map(|p| p.first_match(changed_paths).map(|path| (p, path)))
            {
                debug!(label = %label, pattern = pattern.as_str(), path, "Label matched");
                labels.insert(label.clone());
            }
        }

        labels
    }
}

/// Compiles `label_globs` and resolves them against `changed_paths`.
pub fn resolve<S: AsRef<str>>(label_globs: &LabelGlobs, changed_paths: &[S]) -> LabelSet {
    LabelResolver::new(label_globs).resolve(changed_paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_globs(entries: &[(&str, &[&str])]) -> LabelGlobs {
        entries
            .iter()
            .map(|(label, globs)| {
                (
                    label.to_string(),
                    globs.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    fn sample_globs() -> LabelGlobs {
        label_globs(&[
            ("myLabel1", &["folder1/**/*", "folder1/**/*"]),
            ("myLabel2", &["**/*.md"]),
            ("myLabel3", &["**/*.json"]),
            ("myLabel4", &["folder2/myfile.txt"]),
        ])
    }

    #[test]
    fn docs_label_from_markdown() {
        let globs = label_globs(&[("docs", &["**/*.md"])]);
        let labels = resolve(&globs, &["README.md", "src/a.ts"]);
        assert_eq!(labels, LabelSet::from(["docs".to_string()]));
    }

    #[test]
    fn labels_for_mixed_changes() {
        let changed = [
            "file1",
            "file2.md",
            "otherfolder/file3.md",
            "folder1/fake/foo/matchfile.js",
            "folder2/myfile.txt",
            "folder2/myfile2.txt",
        ];
        let labels = resolve(&sample_globs(), &changed);
        let expected: LabelSet = ["myLabel1", "myLabel2", "myLabel4"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn no_match_gives_empty_set() {
        assert!(resolve(&sample_globs(), &["filedoesnotmatch"]).is_empty());
    }

    #[test]
    fn empty_inputs_give_empty_set() {
        assert!(resolve::<&str>(&sample_globs(), &[]).is_empty());
        assert!(resolve(&LabelGlobs::new(), &["README.md"]).is_empty());
    }

    #[test]
    fn malformed_glob_does_not_block_other_globs() {
        let globs = label_globs(&[("docs", &["[oops", "*.md"])]);
        let labels = resolve(&globs, &["README.md"]);
        assert!(labels.contains("docs"));
    }

    #[test]
    fn resolver_is_reusable() {
        let resolver = LabelResolver::new(&sample_globs());
        assert!(resolver.resolve(&["a.json"]).contains("myLabel3"));
        assert!(!resolver.resolve(&["a.txt"]).contains("myLabel3"));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn empty_changes_never_label(label in "[a-z]{1,10}", glob in "[a-z*/?]{0,12}") {
                let globs = label_globs(&[(label.as_str(), &[glob.as_str()])]);
                prop_assert!(resolve::<String>(&globs, &[]).is_empty());
            }

            #[test]
            fn duplicate_globs_label_once(path in "[a-z]{1,8}/[a-z]{1,8}\\.md", copies in 1_usize..5) {
                let globs: LabelGlobs =
                    [("docs".to_string(), vec!["**/*.md".to_string(); copies])].into();
                let labels = resolve(&globs, &[path]);
                prop_assert_eq!(labels.len(), 1);
            }
        }
    }
}
