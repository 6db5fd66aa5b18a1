//! Data structures for representing ranked scan results.
//!
//! This module defines the per-target record stored by the
//! [`ResultRegistry`](crate::registry::ResultRegistry) and handed out to
//! renderers as snapshots.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// The sizing result for one target.
///
/// # Fields
/// * `path` - The target path (its identity in the registry)
/// * `size` - Size in bytes; unknown (stored as 0) until `calculated`
/// * `calculated` - Whether the size computation has finished
/// * `is_partial` - Whether the size is an undercount from early termination
/// * `elapsed` - Wall-clock time the computation took
/// * `kind` - What the target turned out to be when it was sized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub path: PathBuf,
    pub size: u64,
    pub calculated: bool,
    pub is_partial: bool,
    #[serde(with = "crate::metrics::duration_serde")]
    pub elapsed: Duration,
    pub kind: Option<EntryKind>,
}

impl ResultEntry {
    /// Creates a pending entry for a freshly registered target.
    pub fn pending(path: PathBuf) -> Self {
        Self {
            path,
            size: 0,
            calculated: false,
            is_partial: false,
            elapsed: Duration::ZERO,
            kind: None,
        }
    }

    /// Returns the size if it is known.
    pub fn known_size(&self) -> Option<u64> {
        self.calculated.then_some(self.size)
    }
}

/// Represents the type of a sized target.
///
/// # Variants
/// * `File` - A regular file
/// * `Dir` - A directory subtree
/// * `Other` - Anything else, or a path that vanished before it was sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

impl EntryKind {
    /// Returns a string representation of the entry kind.
    ///
    /// # Returns
    /// * `"FILE"` for `EntryKind::File`
    /// * `"DIR"` for `EntryKind::Dir`
    /// * `"OTHER"` for `EntryKind::Other`
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "FILE",
            EntryKind::Dir => "DIR",
            EntryKind::Other => "OTHER",
        }
    }
}
