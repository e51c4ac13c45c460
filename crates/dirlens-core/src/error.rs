//! Error types for traversal, search, rename and hashing operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Metadata for a path could not be read.
#[derive(Debug, Error)]
pub enum StatError {
    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Generic I/O error.
    #[error("Cannot stat {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StatError {
    /// Create a stat error with path context, classified by the I/O error kind.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path, source },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// The path whose metadata could not be read.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::NotFound { path, .. } | Self::PermissionDenied { path, .. } | Self::Io { path, .. } => path,
        }
    }

    /// Check if the path simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// File content could not be read, streamed or decoded.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened.
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading failed part way through the content.
    #[error("Read failed for {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Content is not valid UTF-8 text.
    #[error("{path} is not valid UTF-8 text")]
    Decode { path: PathBuf },

    /// The search or hash request itself was malformed.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ReadError {
    /// Create an open error.
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a mid-stream read error.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a decode error for content that is not UTF-8 text.
    pub fn decode(path: impl Into<PathBuf>) -> Self {
        Self::Decode { path: path.into() }
    }
}

/// Root enumeration failed or the name pattern was unusable.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The root directory itself could not be read.
    #[error("Cannot read search root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Root path is not a directory.
    #[error("Search root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A name or content pattern could not be compiled.
    #[error("Invalid search pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl SearchError {
    /// Create a root error with path context.
    pub fn root(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::RootUnreadable {
            path: path.into(),
            source,
        }
    }
}

/// Rename failures.
///
/// Only `InvalidRule` and `Search` abort a batch. `Failed` describes a single
/// item and is captured into the result list as a message.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The rename rule could not be compiled.
    #[error("Invalid rename rule '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },

    /// Candidate discovery failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// An individual rename attempt failed.
    #[error("Rename of {path} failed: {message}")]
    Failed { path: PathBuf, message: String },
}

impl RenameError {
    /// Create a per-item failure.
    pub fn failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Failed {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_error_io() {
        let err = StatError::io(
            "/test/path",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, StatError::PermissionDenied { .. }));
        assert_eq!(err.path(), &PathBuf::from("/test/path"));

        let err = StatError::io("/missing", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_error_decode() {
        let err = ReadError::decode("/bin.dat");
        assert!(matches!(err, ReadError::Decode { .. }));
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_invalid_data_stays_a_read_error() {
        let err = ReadError::read("/disk.img", io::Error::new(io::ErrorKind::InvalidData, "bad sector"));
        assert!(matches!(err, ReadError::Read { .. }));
        assert!(err.to_string().contains("bad sector"));
    }

    #[test]
    fn test_rename_error_from_search() {
        let err: RenameError = SearchError::NotADirectory {
            path: PathBuf::from("/file"),
        }
        .into();
        assert!(matches!(err, RenameError::Search(_)));
        assert!(err.to_string().contains("/file"));
    }
}
