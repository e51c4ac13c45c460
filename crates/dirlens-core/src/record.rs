//! File and directory record types.
//!
//! A record is an immutable snapshot of one metadata read. Records carry no
//! identity beyond their path and are never refreshed in place.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Type of a file system entry as reported by a (link-following) stat call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Sockets, devices, fifos and dangling links.
    Other,
}

/// Entry timestamps, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Creation time (falls back to `modified` where the platform has no birth time).
    pub created: DateTime<Utc>,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Last access time.
    pub accessed: DateTime<Utc>,
}

impl Timestamps {
    /// Create timestamps with all three times.
    pub fn new(created: DateTime<Utc>, modified: DateTime<Utc>, accessed: DateTime<Utc>) -> Self {
        Self {
            created,
            modified,
            accessed,
        }
    }

    /// Create timestamps where every field is `time`.
    pub fn uniform(time: DateTime<Utc>) -> Self {
        Self::new(time, time, time)
    }
}

/// Raw metadata for one path, as produced by the stat reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStat {
    /// Canonical path of the entry.
    pub path: PathBuf,
    /// Entry type after following symlinks.
    pub kind: EntryKind,
    /// Size in bytes.
    pub size: u64,
    /// Timestamps.
    pub timestamps: Timestamps,
    /// Permission bits (`mode & 0o7777`).
    pub mode: u32,
    /// Whether the path itself is a symbolic link.
    pub is_symlink: bool,
}

impl EntryStat {
    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Check if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Snapshot of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Canonical path.
    pub path: PathBuf,
    /// Final path component.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Extension without the leading dot, empty if none.
    pub extension: String,
    /// MIME type guessed from the extension.
    pub mime_type: String,
    /// Timestamps.
    #[serde(flatten)]
    pub timestamps: Timestamps,
    /// Permission bits as a three digit octal string, e.g. `"644"`.
    pub permissions: String,
    /// Name begins with `.`.
    pub hidden: bool,
    /// The path is a symbolic link.
    pub symlink: bool,
    /// Any of the owner, group or other execute bits is set.
    pub executable: bool,
}

/// Snapshot of a directory, with an aggregate size over its direct children.
///
/// `total_size` is exact only when `size_is_estimate` is false. Directories
/// with more than [`SIZE_SAMPLE_LIMIT`](crate::SIZE_SAMPLE_LIMIT) entries get
/// a value scaled up from a sample of the first entries in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    /// Base fields shared with files.
    #[serde(flatten)]
    pub entry: FileRecord,
    /// Number of direct children.
    pub item_count: u64,
    /// Sum of direct children sizes, possibly estimated.
    pub total_size: u64,
    /// Whether `total_size` was scaled from a sample.
    pub size_is_estimate: bool,
    /// Directory has no children.
    pub is_empty: bool,
}

/// Either kind of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryRecord {
    File(FileRecord),
    Directory(DirectoryRecord),
}

impl EntryRecord {
    /// Base fields of the record.
    pub fn entry(&self) -> &FileRecord {
        match self {
            Self::File(file) => file,
            Self::Directory(dir) => &dir.entry,
        }
    }

    /// Name of the entry.
    pub fn name(&self) -> &str {
        &self.entry().name
    }

    /// Canonical path of the entry.
    pub fn path(&self) -> &PathBuf {
        &self.entry().path
    }

    /// Check if this record is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Size in bytes; the aggregate (possibly estimated) size for directories.
    pub fn size(&self) -> u64 {
        match self {
            Self::File(file) => file.size,
            Self::Directory(dir) => dir.total_size,
        }
    }
}

/// Check if a file name is hidden by convention.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Format permission bits as a three digit octal string.
pub fn format_permissions(mode: u32) -> String {
    format!("{:03o}", mode & 0o777)
}

/// Check if any execute bit is set.
pub fn has_execute_bit(mode: u32) -> bool {
    mode & 0o111 != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_permissions() {
        assert_eq!(format_permissions(0o100644), "644");
        assert_eq!(format_permissions(0o40755), "755");
        assert_eq!(format_permissions(0o7), "007");
    }

    #[test]
    fn test_execute_bits() {
        assert!(has_execute_bit(0o744));
        assert!(has_execute_bit(0o010));
        assert!(has_execute_bit(0o001));
        assert!(!has_execute_bit(0o644));
    }

    #[test]
    fn test_hidden_name() {
        assert!(is_hidden_name(".git"));
        assert!(!is_hidden_name("src"));
        assert!(!is_hidden_name("a.b"));
    }

    #[test]
    fn test_entry_kind_strings() {
        assert_eq!(EntryKind::Directory.to_string(), "directory");
        assert_eq!("file".parse::<EntryKind>().unwrap(), EntryKind::File);
    }
}
