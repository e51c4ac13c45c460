//! Metadata reads.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use dirlens_core::{EntryKind, EntryStat, StatError, Timestamps};

/// Read metadata for `path`, following symbolic links.
///
/// The link itself is detected first so the returned stat can flag it.
/// A dangling link is reported as [`EntryKind::Other`] with the link's own
/// metadata rather than as an error.
pub fn stat(path: &Path) -> Result<EntryStat, StatError> {
    let link_meta = fs::symlink_metadata(path).map_err(|e| StatError::io(path, e))?;
    let is_symlink = link_meta.file_type().is_symlink();

    let (metadata, kind) = if is_symlink {
        match fs::metadata(path) {
            Ok(target) => {
                let kind = kind_of(&target);
                (target, kind)
            }
            Err(_) => (link_meta, EntryKind::Other),
        }
    } else {
        let kind = kind_of(&link_meta);
        (link_meta, kind)
    };

    Ok(EntryStat {
        path: canonical_path(path).map_err(|e| StatError::io(path, e))?,
        kind,
        size: metadata.len(),
        timestamps: timestamps(&metadata),
        mode: mode_bits(&metadata),
        is_symlink,
    })
}

/// Resolve `path` to an absolute path with a canonical parent.
///
/// The final component is kept as-is so a symbolic link keeps its own name
/// instead of resolving to its target.
pub fn canonical_path(path: &Path) -> std::io::Result<PathBuf> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            Ok(parent.canonicalize()?.join(name))
        }
        (Some(_), Some(name)) => Ok(std::env::current_dir()?.canonicalize()?.join(name)),
        _ => path.canonicalize(),
    }
}

/// Display name for a path: its final component, or the whole path for roots.
pub fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Extension of a name as written, without the dot.
///
/// Dotfiles such as `.bashrc` have no extension.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn kind_of(metadata: &Metadata) -> EntryKind {
    let file_type = metadata.file_type();
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

fn timestamps(metadata: &Metadata) -> Timestamps {
    let modified = to_utc(metadata.modified().ok());
    Timestamps::new(
        metadata.created().ok().map(DateTime::<Utc>::from).unwrap_or(modified),
        modified,
        metadata.accessed().ok().map(DateTime::<Utc>::from).unwrap_or(modified),
    )
}

fn to_utc(time: Option<SystemTime>) -> DateTime<Utc> {
    time.map(DateTime::<Utc>::from)
        .unwrap_or_else(|| DateTime::<Utc>::from(std::time::UNIX_EPOCH))
}

// Cross-platform metadata helpers

/// Get the permission bits from metadata.
#[cfg(unix)]
fn mode_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}
