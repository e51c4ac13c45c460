//! Glob based file and directory discovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{GlobBuilder, GlobMatcher};
use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;

use dirlens_core::{FindOptions, Logger, SearchError, default_logger};

/// Finds entries below a root whose relative path matches a glob.
///
/// Patterns are matched against the path relative to the root with `/`
/// separators, and `*` never crosses a separator. A recursive search
/// matches the pattern at any depth, so `*.rs` finds `main.rs` and
/// `src/lib.rs` alike. Results come back in sorted walk order.
pub struct FileFinder {
    logger: Arc<dyn Logger>,
}

impl FileFinder {
    /// Create a new finder.
    pub fn new() -> Self {
        Self {
            logger: default_logger(),
        }
    }

    /// Use the given logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Find entries under `root` matching `pattern`.
    ///
    /// No match is an empty result, not an error. Only an unreadable root or
    /// an invalid pattern fail the search.
    pub fn find(
        &self,
        root: &Path,
        pattern: &str,
        options: &FindOptions,
    ) -> Result<Vec<PathBuf>, SearchError> {
        let root = root.canonicalize().map_err(|e| SearchError::root(root, e))?;
        fs::read_dir(&root).map_err(|e| {
            if root.is_file() {
                SearchError::NotADirectory { path: root.clone() }
            } else {
                SearchError::root(&root, e)
            }
        })?;

        let matcher = compile_pattern(pattern, options.recursive)?;

        if !options.include_files && !options.include_directories {
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(&root)
            .parallelism(Parallelism::Serial)
            .skip_hidden(!options.include_hidden)
            .follow_links(false)
            .sort(true)
            .min_depth(1)
            .max_depth(options.effective_depth());

        let mut matches = Vec::new();
        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    self.logger.debug(&format!("Skipping during find: {err}"));
                    continue;
                }
            };

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&root) else {
                continue;
            };
            if matcher.is_match(relative_key(relative)) {
                matches.push(path);
            }
        }

        let mut matches = if options.include_files && options.include_directories {
            matches
        } else {
            self.filter_by_type(matches, options.include_directories)
        };

        if let Some(limit) = options.max_results {
            matches.truncate(limit);
        }

        self.logger.debug(&format!(
            "Found {} entries matching '{pattern}' under {}",
            matches.len(),
            root.display()
        ));
        Ok(matches)
    }

    /// Keep only directories (or only non-directories), by stat.
    ///
    /// Each check is independent and read-only, so they run in parallel;
    /// order is preserved. Entries that cannot be stat'ed are dropped.
    fn filter_by_type(&self, paths: Vec<PathBuf>, want_directories: bool) -> Vec<PathBuf> {
        paths
            .into_par_iter()
            .filter(|path| match fs::metadata(path) {
                Ok(metadata) => metadata.is_dir() == want_directories,
                Err(err) => {
                    self.logger
                        .debug(&format!("Dropping {}: {err}", path.display()));
                    false
                }
            })
            .collect()
    }
}

impl Default for FileFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile a glob rooted at the search directory.
pub fn compile_pattern(pattern: &str, recursive: bool) -> Result<GlobMatcher, SearchError> {
    let pattern = pattern.trim_start_matches("./");
    let rooted = if recursive && !pattern.starts_with("**/") {
        format!("**/{pattern}")
    } else {
        pattern.to_string()
    };

    GlobBuilder::new(&rooted)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| SearchError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Relative path in the `/`-separated form patterns are written in.
fn relative_key(relative: &Path) -> String {
    let key = relative.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        key.into_owned()
    } else {
        key.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirlens_core::NullLogger;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir(root.join("docs.txt")).unwrap();
        fs::create_dir(root.join(".cache")).unwrap();

        fs::write(root.join("readme.txt"), "r").unwrap();
        fs::write(root.join("main.rs"), "m").unwrap();
        fs::write(root.join("src/lib.rs"), "l").unwrap();
        fs::write(root.join("src/notes.txt"), "n").unwrap();
        fs::write(root.join("src/nested/deep.txt"), "d").unwrap();
        fs::write(root.join(".cache/hidden.txt"), "h").unwrap();
        fs::write(root.join(".secret.txt"), "s").unwrap();

        temp
    }

    fn finder() -> FileFinder {
        FileFinder::new().with_logger(Arc::new(NullLogger))
    }

    fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        let root = root.canonicalize().unwrap();
        paths
            .iter()
            .map(|p| relative_key(p.strip_prefix(&root).unwrap()))
            .collect()
    }

    #[test]
    fn test_recursive_find() {
        let temp = create_test_tree();
        let found = finder()
            .find(temp.path(), "*.txt", &FindOptions::files_only())
            .unwrap();
        assert_eq!(
            relative(temp.path(), &found),
            vec!["readme.txt", "src/nested/deep.txt", "src/notes.txt"]
        );
    }

    #[test]
    fn test_non_recursive_find() {
        let temp = create_test_tree();
        let options = FindOptions {
            recursive: false,
            ..FindOptions::files_only()
        };
        let found = finder().find(temp.path(), "*.txt", &options).unwrap();
        assert_eq!(relative(temp.path(), &found), vec!["readme.txt"]);
    }

    #[test]
    fn test_directories_only() {
        let temp = create_test_tree();
        let found = finder()
            .find(temp.path(), "*", &FindOptions::directories_only())
            .unwrap();
        assert_eq!(
            relative(temp.path(), &found),
            vec!["docs.txt", "src", "src/nested"]
        );
    }

    #[test]
    fn test_files_and_directories() {
        let temp = create_test_tree();
        let options = FindOptions {
            recursive: false,
            ..FindOptions::default()
        };
        let found = finder().find(temp.path(), "*.txt", &options).unwrap();
        assert_eq!(relative(temp.path(), &found), vec!["docs.txt", "readme.txt"]);
    }

    #[test]
    fn test_include_hidden() {
        let temp = create_test_tree();
        let options = FindOptions {
            include_hidden: true,
            ..FindOptions::files_only()
        };
        let found = finder().find(temp.path(), "*.txt", &options).unwrap();
        let found = relative(temp.path(), &found);
        assert!(found.contains(&".secret.txt".to_string()));
        assert!(found.contains(&".cache/hidden.txt".to_string()));
    }

    #[test]
    fn test_no_match_is_empty() {
        let temp = create_test_tree();
        let found = finder()
            .find(temp.path(), "*.nothing", &FindOptions::default())
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_max_results() {
        let temp = create_test_tree();
        let options = FindOptions {
            max_results: Some(2),
            ..FindOptions::files_only()
        };
        let found = finder().find(temp.path(), "*", &options).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_path_pattern() {
        let temp = create_test_tree();
        let found = finder()
            .find(temp.path(), "src/*.rs", &FindOptions::files_only())
            .unwrap();
        assert_eq!(relative(temp.path(), &found), vec!["src/lib.rs"]);
    }

    #[test]
    fn test_missing_root_fails() {
        let temp = create_test_tree();
        let err = finder()
            .find(&temp.path().join("missing"), "*", &FindOptions::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::RootUnreadable { .. }));
    }

    #[test]
    fn test_file_root_fails() {
        let temp = create_test_tree();
        let err = finder()
            .find(&temp.path().join("main.rs"), "*", &FindOptions::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::NotADirectory { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        let temp = create_test_tree();
        let err = finder()
            .find(temp.path(), "[unclosed", &FindOptions::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { .. }));
    }
}
