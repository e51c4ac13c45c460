//! Option records for traversal, discovery, search and rename.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Number of directory entries whose sizes are read when estimating a
/// directory's aggregate size.
pub const SIZE_SAMPLE_LIMIT: usize = 100;

/// Hard bound on recursion depth, applied even to "unbounded" requests.
pub const MAX_DEPTH_LIMIT: usize = 64;

/// Tree depth used when the caller does not choose one.
pub const DEFAULT_TREE_DEPTH: usize = 3;

/// Default cap on content search matches.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Default number of context lines on each side of a match.
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// Read buffer size for streaming digests.
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Clamp a requested depth (`None` = unbounded) to [`MAX_DEPTH_LIMIT`].
pub fn bounded_depth(requested: Option<usize>) -> usize {
    requested.unwrap_or(MAX_DEPTH_LIMIT).min(MAX_DEPTH_LIMIT)
}

fn check_depth(requested: Option<usize>) -> Result<(), String> {
    match requested {
        Some(depth) if depth > MAX_DEPTH_LIMIT => Err(format!(
            "max_depth {depth} exceeds the limit of {MAX_DEPTH_LIMIT}"
        )),
        _ => Ok(()),
    }
}

/// Options for building a display tree.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct TreeOptions {
    /// Levels of children to expand below the root (`None` = as deep as allowed).
    #[builder(default = "Some(DEFAULT_TREE_DEPTH)")]
    pub max_depth: Option<usize>,

    /// Include entries whose name begins with `.`.
    #[builder(default = "false")]
    pub include_hidden: bool,

    /// Include file leaves; directories only when false.
    #[builder(default = "true")]
    pub include_files: bool,

    /// Record file sizes on leaves.
    #[builder(default = "true")]
    pub include_sizes: bool,
}

impl TreeOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        check_depth(self.max_depth.flatten())
    }
}

impl TreeOptions {
    /// Create a new options builder.
    pub fn builder() -> TreeOptionsBuilder {
        TreeOptionsBuilder::default()
    }

    /// The depth actually enforced.
    pub fn effective_depth(&self) -> usize {
        bounded_depth(self.max_depth)
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_TREE_DEPTH),
            include_hidden: false,
            include_files: true,
            include_sizes: true,
        }
    }
}

/// Options for pattern based file discovery.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct FindOptions {
    /// Match at any depth below the root instead of direct children only.
    #[builder(default = "true")]
    pub recursive: bool,

    /// Include entries whose name begins with `.` (and descend into hidden directories).
    #[builder(default = "false")]
    pub include_hidden: bool,

    /// Return files.
    #[builder(default = "true")]
    pub include_files: bool,

    /// Return directories.
    #[builder(default = "true")]
    pub include_directories: bool,

    /// Depth bound for recursive searches (`None` = as deep as allowed).
    #[builder(default)]
    pub max_depth: Option<usize>,

    /// Stop after this many matches.
    #[builder(default)]
    pub max_results: Option<usize>,
}

impl FindOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        check_depth(self.max_depth.flatten())
    }
}

impl FindOptions {
    /// Create a new options builder.
    pub fn builder() -> FindOptionsBuilder {
        FindOptionsBuilder::default()
    }

    /// Options that return files only.
    pub fn files_only() -> Self {
        Self {
            include_directories: false,
            ..Self::default()
        }
    }

    /// Options that return directories only.
    pub fn directories_only() -> Self {
        Self {
            include_files: false,
            ..Self::default()
        }
    }

    /// The depth actually enforced.
    pub fn effective_depth(&self) -> usize {
        if self.recursive {
            bounded_depth(self.max_depth)
        } else {
            1
        }
    }
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            include_hidden: false,
            include_files: true,
            include_directories: true,
            max_depth: None,
            max_results: None,
        }
    }
}

/// Options for content search.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct SearchOptions {
    /// Stop after this many matches.
    #[builder(default = "DEFAULT_MAX_RESULTS")]
    pub max_results: usize,

    /// Lines of context on each side of a match.
    #[builder(default = "DEFAULT_CONTEXT_LINES")]
    pub context_lines: usize,

    /// Match case exactly.
    #[builder(default = "false")]
    pub case_sensitive: bool,
}

impl SearchOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_results == Some(0) {
            return Err("max_results must be at least 1".to_string());
        }
        Ok(())
    }
}

impl SearchOptions {
    /// Create a new options builder.
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            context_lines: DEFAULT_CONTEXT_LINES,
            case_sensitive: false,
        }
    }
}

/// Options for batch rename.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(default)]
pub struct RenameOptions {
    /// Select candidates at any depth below the root.
    #[builder(default = "false")]
    pub recursive: bool,

    /// Include hidden files as candidates.
    #[builder(default = "false")]
    pub include_hidden: bool,

    /// Compute and report new names without touching the file system.
    #[builder(default = "false")]
    pub dry_run: bool,
}

impl RenameOptions {
    /// Create a new options builder.
    pub fn builder() -> RenameOptionsBuilder {
        RenameOptionsBuilder::default()
    }

    /// Options for a non-recursive preview.
    pub fn preview() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Discovery options used to select rename candidates: files only.
    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            recursive: self.recursive,
            include_hidden: self.include_hidden,
            include_files: true,
            include_directories: false,
            max_depth: None,
            max_results: None,
        }
    }
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            include_hidden: false,
            dry_run: false,
        }
    }
}
