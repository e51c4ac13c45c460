//! Batch rename over finder results.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dirlens_core::{
    Logger, RenameError, RenameOptions, RenameReport, RenameResult, RenameRule, RenameStatus,
    default_logger,
};
use dirlens_scan::FileFinder;

use crate::rule::CompiledRule;

/// Renames every file matching a glob by applying a [`RenameRule`] to its
/// base name.
///
/// Each candidate gets exactly one [`RenameResult`], in discovery order.
/// Per-file failures are recorded and the batch continues; only an invalid
/// rule or an unreadable root fail the whole call. A batch is not
/// transactional, so a mix of `success` and `error` results is possible.
pub struct RenameEngine {
    finder: FileFinder,
    logger: Arc<dyn Logger>,
}

impl RenameEngine {
    /// Create a new rename engine.
    pub fn new() -> Self {
        Self {
            finder: FileFinder::new(),
            logger: default_logger(),
        }
    }

    /// Use the given logger here and for candidate discovery.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.finder = self.finder.with_logger(logger.clone());
        self.logger = logger;
        self
    }

    /// Rename files under `root` whose relative path matches `pattern`.
    pub fn rename(
        &self,
        root: &Path,
        pattern: &str,
        rule: &RenameRule,
        options: &RenameOptions,
    ) -> Result<RenameReport, RenameError> {
        let rule = CompiledRule::compile(rule)?;
        let candidates = self.finder.find(root, pattern, &options.find_options())?;

        let mut plan = options.dry_run.then(Plan::default);
        let results = candidates
            .into_iter()
            .map(|path| self.rename_one(path, &rule, plan.as_mut()))
            .collect();
        let report = RenameReport { results };

        self.logger.info(&format!(
            "Rename '{pattern}' under {}: {}",
            root.display(),
            report.summary()
        ));
        Ok(report)
    }

    /// Rename one candidate. With a `plan`, nothing is touched and the
    /// outcome is simulated against the earlier planned renames.
    fn rename_one(
        &self,
        old_path: PathBuf,
        rule: &CompiledRule,
        plan: Option<&mut Plan>,
    ) -> RenameResult {
        let Some(old_name) = old_path.file_name().and_then(|n| n.to_str()) else {
            let message = "file name is not valid UTF-8";
            self.logger
                .warn(&RenameError::failed(&old_path, message).to_string());
            return RenameResult::failed(old_path.clone(), old_path, message);
        };

        let new_name = rule.apply(old_name).into_owned();
        if new_name == old_name {
            return RenameResult::new(old_path.clone(), old_path, RenameStatus::Skipped);
        }

        let new_path = old_path.with_file_name(&new_name);
        let (outcome, status) = match plan {
            Some(plan) => (
                plan.claim(&old_path, &new_path, &new_name),
                RenameStatus::DryRun,
            ),
            None => (
                commit(&old_path, &new_path, &new_name),
                RenameStatus::Success,
            ),
        };

        match outcome {
            Ok(()) => {
                self.logger.debug(&format!(
                    "{status}: {} -> {}",
                    old_path.display(),
                    new_path.display()
                ));
                RenameResult::new(old_path, new_path, status)
            }
            Err(message) => {
                self.logger
                    .warn(&RenameError::failed(&old_path, &message).to_string());
                RenameResult::failed(old_path, new_path, message)
            }
        }
    }
}

impl Default for RenameEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Renames a preview has already assigned, so later candidates see the
/// directory as the real run would leave it.
#[derive(Debug, Default)]
struct Plan {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl Plan {
    /// Run the checks `commit` would run and record the rename on success.
    fn claim(&mut self, old_path: &Path, new_path: &Path, new_name: &str) -> Result<(), String> {
        validate_filename(new_name)?;

        let on_disk = occupied(new_path) && !self.vacated.contains(new_path);
        if self.claimed.contains(new_path) || (on_disk && !same_entry(old_path, new_path)) {
            return Err(format!("'{new_name}' already exists"));
        }

        self.vacated.insert(old_path.to_path_buf());
        self.claimed.insert(new_path.to_path_buf());
        Ok(())
    }
}

/// Validate and perform a single rename. Never overwrites another entry.
fn commit(old_path: &Path, new_path: &Path, new_name: &str) -> Result<(), String> {
    validate_filename(new_name)?;

    if occupied(new_path) && !same_entry(old_path, new_path) {
        return Err(format!("'{new_name}' already exists"));
    }

    fs::rename(old_path, new_path).map_err(|e| format!("Rename failed: {e}"))
}

/// Whether anything, including a dangling link, sits at `path`.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Whether two paths name the same directory entry, e.g. a case-only rename
/// on a case-insensitive file system. Links are compared as themselves, never
/// through their targets.
#[cfg(unix)]
fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_entry(a: &Path, b: &Path) -> bool {
    let (Ok(a_meta), Ok(b_meta)) = (fs::symlink_metadata(a), fs::symlink_metadata(b)) else {
        return false;
    };
    if a_meta.file_type().is_symlink() || b_meta.file_type().is_symlink() {
        return false;
    }

    let case_only = match (a.file_name(), b.file_name()) {
        (Some(x), Some(y)) => x.to_string_lossy().eq_ignore_ascii_case(&y.to_string_lossy()),
        _ => false,
    };
    case_only && matches!((a.canonicalize(), b.canonicalize()), (Ok(x), Ok(y)) if x == y)
}

/// Validate a filename for cross-platform compatibility.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 characters)".into());
    }

    // Check for invalid characters
    let invalid_chars = ['/', '\0'];
    for c in invalid_chars {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c));
        }
    }

    // Additional Windows restrictions (good to enforce everywhere for portability)
    #[cfg(target_os = "windows")]
    {
        let windows_invalid = ['\\', ':', '*', '?', '"', '<', '>', '|'];
        for c in windows_invalid {
            if name.contains(c) {
                return Err(format!("Name cannot contain '{}'", c));
            }
        }

        // Check for reserved names
        let reserved = [
            "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
            "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
        ];
        let upper_name = name.to_uppercase();
        let base_name = upper_name.split('.').next().unwrap_or("");
        if reserved.contains(&base_name) {
            return Err("Reserved filename".into());
        }
    }

    // Check for leading/trailing spaces or dots (problematic on Windows)
    if name.starts_with(' ') || name.ends_with(' ') {
        return Err("Name cannot start or end with spaces".into());
    }

    if name.ends_with('.') {
        return Err("Name cannot end with a dot".into());
    }

    // Check for . and .. which are reserved
    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirlens_core::{MemoryLogger, NullLogger, RegexFlags};
    use tempfile::TempDir;

    fn engine() -> RenameEngine {
        RenameEngine::new().with_logger(Arc::new(NullLogger))
    }

    fn statuses(report: &RenameReport) -> Vec<RenameStatus> {
        report.results.iter().map(|r| r.status).collect()
    }

    #[test]
    fn test_rename_applies_to_base_name_only() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("draft_dir")).unwrap();
        fs::write(temp.path().join("draft_dir/draft_a.txt"), "a").unwrap();

        let options = RenameOptions {
            recursive: true,
            ..RenameOptions::default()
        };
        let report = engine()
            .rename(temp.path(), "*.txt", &RenameRule::literal("draft_", "final_"), &options)
            .unwrap();

        assert_eq!(statuses(&report), vec![RenameStatus::Success]);
        assert!(temp.path().join("draft_dir/final_a.txt").exists());
        assert!(!temp.path().join("draft_dir/draft_a.txt").exists());
    }

    #[test]
    fn test_unchanged_name_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("keep.txt"), "k").unwrap();

        let report = engine()
            .rename(temp.path(), "*", &RenameRule::literal("zzz", "y"), &RenameOptions::default())
            .unwrap();

        assert_eq!(statuses(&report), vec![RenameStatus::Skipped]);
        assert_eq!(report.results[0].old_path, report.results[0].new_path);
    }

    #[test]
    fn test_existing_target_is_error_and_batch_continues() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.log"), "a").unwrap();
        fs::write(temp.path().join("a.txt"), "existing").unwrap();
        fs::write(temp.path().join("b.log"), "b").unwrap();

        let logger = Arc::new(MemoryLogger::new());
        let report = RenameEngine::new()
            .with_logger(logger.clone())
            .rename(
                temp.path(),
                "*.log",
                &RenameRule::regex(r"\.log$", RegexFlags::default(), ".txt"),
                &RenameOptions::default(),
            )
            .unwrap();

        assert_eq!(statuses(&report), vec![RenameStatus::Error, RenameStatus::Success]);
        assert!(report.results[0].error.as_deref().unwrap().contains("already exists"));
        assert_eq!(fs::read_to_string(temp.path().join("a.txt")).unwrap(), "existing");
        assert!(temp.path().join("b.txt").exists());
        assert!(!report.is_success());
        assert_eq!(logger.count(tracing::Level::WARN), 1);
    }

    #[test]
    fn test_invalid_new_name_is_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("report.txt"), "r").unwrap();

        let report = engine()
            .rename(temp.path(), "*", &RenameRule::literal("report", "a/b"), &RenameOptions::default())
            .unwrap();

        assert_eq!(statuses(&report), vec![RenameStatus::Error]);
        assert!(temp.path().join("report.txt").exists());
    }

    #[test]
    fn test_dry_run_reports_new_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("one.txt"), "1").unwrap();

        let report = engine()
            .rename(temp.path(), "*", &RenameRule::literal("one", "two"), &RenameOptions::preview())
            .unwrap();

        assert_eq!(statuses(&report), vec![RenameStatus::DryRun]);
        assert_eq!(report.results[0].new_path.file_name().unwrap(), "two.txt");
        assert!(temp.path().join("one.txt").exists());
        assert!(!temp.path().join("two.txt").exists());
    }

    #[test]
    fn test_invalid_rule_fails_batch() {
        let temp = TempDir::new().unwrap();
        let err = engine()
            .rename(
                temp.path(),
                "*",
                &RenameRule::regex("(", RegexFlags::default(), ""),
                &RenameOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RenameError::InvalidRule { .. }));
    }

    #[test]
    fn test_missing_root_fails_batch() {
        let temp = TempDir::new().unwrap();
        let err = engine()
            .rename(
                &temp.path().join("missing"),
                "*",
                &RenameRule::literal("a", "b"),
                &RenameOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RenameError::Search(_)));
    }

    #[test]
    fn test_validate_filename_valid() {
        assert!(validate_filename("test.txt").is_ok());
        assert!(validate_filename("my-file").is_ok());
        assert!(validate_filename(".hidden").is_ok());
        assert!(validate_filename("file with spaces").is_ok());
    }

    #[test]
    fn test_validate_filename_invalid() {
        assert!(validate_filename("").is_err());
        assert!(validate_filename("test/file").is_err());
        assert!(validate_filename(".").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("file ").is_err());
        assert!(validate_filename(" file").is_err());
        assert!(validate_filename("file.").is_err());
    }
}
