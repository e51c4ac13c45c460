//! File operations engine for dirlens.
//!
//! This crate provides batch rename over glob-selected files, with literal
//! or regex substitution and a dry-run preview that never touches the file
//! system.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use dirlens_ops::{RenameEngine, RenameOptions, RenameRule};
//!
//! let engine = RenameEngine::new();
//! let report = engine
//!     .rename(
//!         Path::new("/photos"),
//!         "*.JPEG",
//!         &RenameRule::literal(".JPEG", ".jpg"),
//!         &RenameOptions::preview(),
//!     )
//!     .unwrap();
//!
//! for result in &report.results {
//!     println!("{} -> {} ({})", result.old_path.display(), result.new_path.display(), result.status);
//! }
//! ```

mod rename;
mod rule;

pub use rename::{RenameEngine, validate_filename};
pub use rule::CompiledRule;

pub use dirlens_core::{
    RegexFlags, RenameError, RenameOptions, RenameReport, RenameResult, RenameRule, RenameStatus,
    Replacement,
};
