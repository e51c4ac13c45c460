//! Result values returned by rename, content search and hashing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Outcome of one rename candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RenameStatus {
    /// The file was renamed.
    Success,
    /// The rename was attempted and failed.
    Error,
    /// The rule left the name unchanged.
    Skipped,
    /// Preview only; nothing was touched.
    DryRun,
}

/// Result for a single rename candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameResult {
    /// Path before the rename.
    pub old_path: PathBuf,
    /// Computed path after the rename.
    pub new_path: PathBuf,
    /// What happened.
    pub status: RenameStatus,
    /// Failure message for `Error` results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenameResult {
    /// Create a result without an error message.
    pub fn new(old_path: PathBuf, new_path: PathBuf, status: RenameStatus) -> Self {
        Self {
            old_path,
            new_path,
            status,
            error: None,
        }
    }

    /// Create an `Error` result.
    pub fn failed(old_path: PathBuf, new_path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            old_path,
            new_path,
            status: RenameStatus::Error,
            error: Some(message.into()),
        }
    }
}

/// Ordered results of a batch rename, in discovery order.
///
/// A batch is not transactional: a mix of `Success` and `Error` entries is a
/// normal outcome that the caller has to inspect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameReport {
    pub results: Vec<RenameResult>,
}

impl RenameReport {
    /// Number of results with the given status.
    pub fn count(&self, status: RenameStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Check if every attempted rename succeeded.
    pub fn is_success(&self) -> bool {
        self.count(RenameStatus::Error) == 0
    }

    /// Check if there were no candidates.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Human-readable one line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} renamed, {} failed, {} unchanged, {} previewed",
            self.count(RenameStatus::Success),
            self.count(RenameStatus::Error),
            self.count(RenameStatus::Skipped),
            self.count(RenameStatus::DryRun),
        )
    }
}

/// One matching line with its surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMatch {
    /// 1-based line number of the match.
    pub line_number: usize,
    /// The matching line, without its line terminator.
    pub line: String,
    /// Lines before and after the match, each formatted as `"{n}: {text}"`.
    pub context: Vec<String>,
}

/// Matches found in one file of a multi-file search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatches {
    pub path: PathBuf,
    pub matches: Vec<ContentMatch>,
}

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
    Blake3,
}

impl HashAlgorithm {
    /// Length of the hex digest in characters.
    pub fn hex_len(self) -> usize {
        match self {
            Self::Sha256 | Self::Blake3 => 64,
            Self::Sha512 => 128,
        }
    }
}

/// Hex digest of a file's content at read time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileDigest {
    /// Algorithm the digest was computed with.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub hex: String,
    /// Number of bytes streamed through the digest.
    pub bytes_read: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_status_strings() {
        assert_eq!(RenameStatus::DryRun.to_string(), "dry-run");
        assert_eq!("skipped".parse::<RenameStatus>().unwrap(), RenameStatus::Skipped);
    }

    #[test]
    fn test_report_counts() {
        let report = RenameReport {
            results: vec![
                RenameResult::new("a".into(), "b".into(), RenameStatus::Success),
                RenameResult::failed("c".into(), "d".into(), "denied"),
                RenameResult::new("e".into(), "e".into(), RenameStatus::Skipped),
            ],
        };
        assert_eq!(report.count(RenameStatus::Success), 1);
        assert!(!report.is_success());
        assert_eq!(report.summary(), "1 renamed, 1 failed, 1 unchanged, 0 previewed");
    }

    #[test]
    fn test_hash_algorithm_parse() {
        assert_eq!("SHA256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("blake3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
        assert!("md4".parse::<HashAlgorithm>().is_err());
        assert_eq!(HashAlgorithm::Sha512.hex_len(), 128);
    }
}
