//! Content analysis for dirlens.
//!
//! This crate looks inside files:
//!
//! - **Content search** - line matches with surrounding context, in one
//!   file or across a glob-selected set of files
//! - **Hashing** - streaming SHA-256, SHA-512 or BLAKE3 digests
//!
//! # Content Search
//!
//! ```rust,no_run
//! use std::path::Path;
//! use dirlens_analyze::{ContentSearcher, SearchOptions, SearchPattern};
//!
//! let searcher = ContentSearcher::new();
//! let matches = searcher
//!     .search(Path::new("src/main.rs"), &SearchPattern::literal("TODO"), &SearchOptions::default())
//!     .unwrap();
//!
//! for m in matches {
//!     println!("{}: {}", m.line_number, m.line);
//! }
//! ```
//!
//! # Hashing
//!
//! Content is streamed through the digest in fixed-size chunks, so memory
//! use does not grow with file size:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use dirlens_analyze::{HashAlgorithm, HashComputer};
//!
//! let digest = HashComputer::new()
//!     .hash(Path::new("release.tar.gz"), HashAlgorithm::Sha256)
//!     .unwrap();
//! println!("{}  {} bytes", digest.hex, digest.bytes_read);
//! ```

mod hash;
mod search;

pub use hash::HashComputer;
pub use search::{ContentSearcher, search_text, split_lines};

pub use dirlens_core::{
    ContentMatch, FileDigest, FileMatches, HashAlgorithm, ReadError, SearchOptions, SearchPattern,
};
