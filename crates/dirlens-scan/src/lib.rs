//! File system reading engine for dirlens.
//!
//! This crate turns paths into the records and trees defined in
//! `dirlens-core`.
//!
//! # Overview
//!
//! - [`RecordBuilder`] describes single entries and directory listings,
//!   with directory sizes estimated by [`SizeEstimator`]
//! - [`TreeBuilder`] builds sorted, depth-bounded display trees
//! - [`FileFinder`] finds entries whose relative path matches a glob
//!
//! Every engine takes an optional [`Logger`]; none of them log through a
//! global.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use dirlens_scan::{FileFinder, FindOptions, TreeBuilder, TreeOptions, TreeSummary};
//!
//! let tree = TreeBuilder::new()
//!     .build(Path::new("/path/to/project"), &TreeOptions::default())
//!     .unwrap();
//! let summary = TreeSummary::from_tree(&tree);
//! println!("{} files in {} directories", summary.files, summary.directories);
//!
//! let sources = FileFinder::new()
//!     .find(Path::new("/path/to/project"), "*.rs", &FindOptions::files_only())
//!     .unwrap();
//! println!("{} Rust files", sources.len());
//! ```

mod builder;
mod estimate;
mod finder;
mod stat;
mod tree;

pub use builder::{RecordBuilder, directory_record, file_record};
pub use estimate::{SizeEstimate, SizeEstimator, scale_sample};
pub use finder::{FileFinder, compile_pattern};
pub use stat::{canonical_path, entry_name, extension_of, stat};
pub use tree::TreeBuilder;

// Re-export core types for convenience
pub use dirlens_core::{
    DirectoryRecord, EntryRecord, EntryStat, FileRecord, FindOptions, Logger, SearchError,
    StatError, TreeNode, TreeOptions, TreeSummary,
};
