//! Core types for dirlens.
//!
//! This crate provides the data structures shared by every dirlens crate:
//! file and directory records, display trees, pattern and rule variants,
//! operation results, option records, error kinds and the logging
//! capability engines accept.

mod config;
mod error;
mod logger;
mod mime;
mod outcome;
mod pattern;
mod record;
mod tree;

pub use config::{
    DEFAULT_CONTEXT_LINES, DEFAULT_MAX_RESULTS, DEFAULT_TREE_DEPTH, FindOptions, FindOptionsBuilder,
    HASH_BUFFER_SIZE, MAX_DEPTH_LIMIT, RenameOptions, RenameOptionsBuilder, SIZE_SAMPLE_LIMIT, SearchOptions,
    SearchOptionsBuilder, TreeOptions, TreeOptionsBuilder, bounded_depth,
};
pub use error::{ReadError, RenameError, SearchError, StatError};
pub use logger::{Logger, MemoryLogger, NullLogger, TracingLogger, default_logger};
pub use mime::{DEFAULT_MIME_TYPE, DIRECTORY_MIME_TYPE, mime_from_extension};
pub use outcome::{
    ContentMatch, FileDigest, FileMatches, HashAlgorithm, RenameReport, RenameResult, RenameStatus,
};
pub use pattern::{RegexFlags, RenameRule, Replacement, SearchPattern};
pub use record::{
    DirectoryRecord, EntryKind, EntryRecord, EntryStat, FileRecord, Timestamps, format_permissions,
    has_execute_bit, is_hidden_name,
};
pub use tree::{NodeType, TreeNode, TreeSummary, display_order};
