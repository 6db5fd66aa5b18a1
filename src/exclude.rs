//! Administrative deny-list for paths that must never be scanned.
//!
//! Entries are absolute path prefixes. Both the prefixes and every queried
//! path are normalized (made absolute, `.`/`..` resolved) and case-folded
//! before comparison, and the comparison is component-wise: `/data`
//! excludes `/data/x` but not `/database`.

use crate::utils::{fold_case, normalize_path};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prefix-based path exclusion.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    prefixes: Vec<PathBuf>,
}

impl ExclusionFilter {
    /// Builds a filter from a list of path prefixes.
    ///
    /// Prefixes that cannot be normalized are dropped with a warning.
    pub fn new<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let prefixes = prefixes
            .into_iter()
            .filter_map(|p| match normalize_path(p.as_ref()) {
                Ok(normalized) => Some(fold_case(&normalized)),
                Err(err) => {
                    warn!(
                        prefix = %p.as_ref().display(),
                        error = %err,
                        "Ignoring unusable exclude prefix"
                    );
                    None
                }
            })
            .collect();
        Self { prefixes }
    }

    /// Returns true if `path` lies under any configured prefix.
    ///
    /// Fails closed: a path that cannot be normalized is reported as excluded.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let normalized = match normalize_path(path) {
            Ok(normalized) => fold_case(&normalized),
            Err(err) => {
                debug!(
                    path = %path.display(),
                    error = %err,
                    "Excluding path that cannot be normalized"
                );
                return true;
            }
        };
        self.prefixes.iter().any(|prefix| normalized.starts_with(prefix))
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }
}
