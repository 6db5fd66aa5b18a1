//! Target discovery for `duwiz`.
//!
//! This module handles:
//! - Deciding which paths are sized independently ([`is_target_unit`])
//! - Depth-bounded traversal from the root using `WalkDir`
//! - Pruning excluded subtrees via [`ExclusionFilter`]
//! - Registering every discovered target in the [`ResultRegistry`]
//!
//! The main entry point is [`collect_targets`]. Traversal never follows
//! symbolic links, and an unreadable subtree only loses that subtree:
//! siblings are still visited.

use crate::exclude::ExclusionFilter;
use crate::registry::ResultRegistry;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Decides whether `path`, found `depth` levels below the root, is an
/// aggregation unit that gets its own size computation.
///
/// # Rules
/// * Symbolic links are never targets
/// * With `max_depth == 0` only regular files are targets
/// * Anything at exactly `max_depth` is a target
/// * Regular files shallower than `max_depth` are targets
/// * Shallower directories are not targets; the walk descends into them
///
/// Any error while classifying the path yields `false`.
pub fn is_target_unit(path: &Path, depth: usize, max_depth: usize) -> bool {
    let file_type = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata.file_type(),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Cannot classify path");
            return false;
        }
    };

    if file_type.is_symlink() {
        return false;
    }
    if max_depth == 0 {
        return file_type.is_file();
    }
    depth == max_depth || (depth < max_depth && file_type.is_file())
}

/// Walks `root` down to `max_depth` and registers every target unit.
///
/// # Arguments
/// * `root` - The path to start from (depth 0)
/// * `max_depth` - Deepest level that is visited
/// * `filter` - Deny-list; excluded paths are pruned with their subtrees
/// * `registry` - Receives one pending entry per target
///
/// # Returns
/// The number of targets newly registered.
///
/// Children are visited in file-name order so registration order, which
/// breaks ranking ties, is deterministic.
pub fn collect_targets(
    root: &Path,
    max_depth: usize,
    filter: &ExclusionFilter,
    registry: &ResultRegistry,
) -> usize {
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !filter.is_excluded(e.path()));

    let mut registered = 0;
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "Skipping unreadable subtree");
                continue;
            }
        };

        if is_target_unit(entry.path(), entry.depth(), max_depth)
            && registry.add_target(entry.path())
        {
            registered += 1;
        }
    }

    debug!(root = %root.display(), registered, "Target collection finished");
    registered
}
