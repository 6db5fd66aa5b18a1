//! Utility functions for the `duwiz` scanner.
//!
//! This module provides:
//! - Lexical path normalization and case folding for exclusion checks
//! - Size measurement from file metadata (apparent length or allocated blocks)
//!
//! None of these helpers follow symbolic links.

use crate::size::SizeMode;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute and resolves `.` and `..` without touching the
/// filesystem beyond reading the current directory for relative paths.
///
/// A `..` at the filesystem root stays at the root.
///
/// # Errors
/// Returns an error only when `path` is relative and the current directory
/// cannot be determined.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Lower-cases every component of `path` for case-insensitive comparison.
pub fn fold_case(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase())
}

/// Returns the size of a file according to `mode`.
///
/// `SizeMode::DiskUsage` uses the `st_blocks` field multiplied by 512 to get
/// the space actually allocated, like the `du` command. Platforms without
/// block counts fall back to the apparent length.
pub fn measured_size(metadata: &Metadata, mode: SizeMode) -> u64 {
    match mode {
        SizeMode::Apparent => metadata.len(),
        SizeMode::DiskUsage => allocated_bytes(metadata),
    }
}

#[cfg(unix)]
fn allocated_bytes(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.blocks() * 512
}

#[cfg(not(unix))]
fn allocated_bytes(metadata: &Metadata) -> u64 {
    metadata.len()
}
