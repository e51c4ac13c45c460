//! Record construction from raw metadata.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use dirlens_core::{
    DIRECTORY_MIME_TYPE, DirectoryRecord, EntryRecord, EntryStat, FileRecord, Logger, StatError,
    default_logger, format_permissions, has_execute_bit, is_hidden_name, mime_from_extension,
};

use crate::estimate::{SizeEstimate, SizeEstimator};
use crate::stat::{entry_name, extension_of, stat};

/// Builds file and directory records.
pub struct RecordBuilder {
    estimator: SizeEstimator,
    logger: Arc<dyn Logger>,
}

impl RecordBuilder {
    /// Create a builder with the default estimator.
    pub fn new() -> Self {
        Self {
            estimator: SizeEstimator::new(),
            logger: default_logger(),
        }
    }

    /// Use the given logger here and in the size estimator.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.estimator = self.estimator.with_logger(logger.clone());
        self.logger = logger;
        self
    }

    /// Use a custom size estimator.
    pub fn with_estimator(mut self, estimator: SizeEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Read and describe a single entry.
    pub fn build(&self, path: &Path) -> Result<EntryRecord, StatError> {
        let stat = stat(path)?;
        if stat.is_dir() {
            let estimate = self.estimator.estimate(&stat.path)?;
            Ok(EntryRecord::Directory(directory_record(&stat, &estimate)))
        } else {
            Ok(EntryRecord::File(file_record(&stat)))
        }
    }

    /// Describe the direct children of `dir`, directories first then by name.
    ///
    /// Children whose metadata cannot be read are skipped. Listing the
    /// directory itself is the only hard failure.
    pub fn list_directory(&self, dir: &Path, include_hidden: bool) -> Result<Vec<EntryRecord>, StatError> {
        let entries = fs::read_dir(dir).map_err(|e| StatError::io(dir, e))?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.logger
                        .debug(&format!("Skipping entry in {}: {err}", dir.display()));
                    continue;
                }
            };
            if !include_hidden && is_hidden_name(&entry.file_name().to_string_lossy()) {
                continue;
            }
            match self.build(&entry.path()) {
                Ok(record) => records.push(record),
                Err(err) => self.logger.debug(&format!("Skipping {err}")),
            }
        }

        records.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name().cmp(b.name())));
        Ok(records)
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a file record from raw metadata.
pub fn file_record(stat: &EntryStat) -> FileRecord {
    let name = entry_name(&stat.path);
    let extension = extension_of(&name);
    let mime_type = if stat.is_dir() {
        DIRECTORY_MIME_TYPE
    } else {
        mime_from_extension(&extension)
    };

    FileRecord {
        path: stat.path.clone(),
        hidden: is_hidden_name(&name),
        mime_type: mime_type.to_string(),
        name,
        size: stat.size,
        extension,
        timestamps: stat.timestamps,
        permissions: format_permissions(stat.mode),
        symlink: stat.is_symlink,
        executable: has_execute_bit(stat.mode),
    }
}

/// Build a directory record from raw metadata and a size estimate.
pub fn directory_record(stat: &EntryStat, estimate: &SizeEstimate) -> DirectoryRecord {
    DirectoryRecord {
        entry: file_record(stat),
        item_count: estimate.item_count,
        total_size: estimate.total_size,
        size_is_estimate: estimate.is_estimate(),
        is_empty: estimate.item_count == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dirlens_core::{EntryKind, NullLogger, Timestamps};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn raw(path: &str, kind: EntryKind, mode: u32) -> EntryStat {
        EntryStat {
            path: PathBuf::from(path),
            kind,
            size: 7,
            timestamps: Timestamps::uniform(Utc.with_ymd_and_hms(2023, 5, 6, 7, 8, 9).unwrap()),
            mode,
            is_symlink: false,
        }
    }

    #[test]
    fn test_file_record_fields() {
        let record = file_record(&raw("/data/Report.PDF", EntryKind::File, 0o100644));
        assert_eq!(record.name, "Report.PDF");
        assert_eq!(record.extension, "PDF");
        assert_eq!(record.mime_type, "application/pdf");
        assert_eq!(record.permissions, "644");
        assert!(!record.executable);
        assert!(!record.hidden);
        assert_eq!(record.size, 7);
    }

    #[test]
    fn test_file_record_flags() {
        let record = file_record(&raw("/data/.env", EntryKind::File, 0o100750));
        assert!(record.hidden);
        assert!(record.executable);
        assert_eq!(record.extension, "");
        assert_eq!(record.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_file_record_is_deterministic() {
        let stat = raw("/data/a.rs", EntryKind::File, 0o644);
        assert_eq!(file_record(&stat), file_record(&stat));
    }

    #[test]
    fn test_directory_record_from_estimate() {
        let stat = raw("/data/many", EntryKind::Directory, 0o40755);
        let estimate = SizeEstimate {
            item_count: 200,
            sampled: 100,
            sampled_bytes: 1000,
            total_size: 2000,
        };
        let record = directory_record(&stat, &estimate);
        assert_eq!(record.entry.mime_type, "inode/directory");
        assert_eq!(record.item_count, 200);
        assert_eq!(record.total_size, 2000);
        assert!(record.size_is_estimate);
        assert!(!record.is_empty);
    }

    #[test]
    fn test_list_sorts_and_hides() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join(".hidden"), "h").unwrap();
        fs::create_dir(temp.path().join("zdir")).unwrap();

        let builder = RecordBuilder::new().with_logger(Arc::new(NullLogger));
        let names: Vec<_> = builder
            .list_directory(temp.path(), false)
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["zdir", "a.txt", "b.txt"]);

        let all = builder.list_directory(temp.path(), true).unwrap();
        assert_eq!(all.len(), 4);
    }
}
