//! Thread-safe ranked store of per-target results.
//!
//! The registry holds exactly one [`ResultEntry`] per registered target.
//! Entries are inserted during collection, completed once by their sizing
//! task, and read back as ranked snapshots by the renderer while sizing is
//! still running.
//!
//! A single [`parking_lot::Mutex`] guards the entry list, the path index and
//! the completion counter together, so every operation observes one
//! consistent state. This matters for the early-termination check in
//! [`crate::size`], which needs "how many targets are still pending" and
//! "what is the current leader" from the same instant. No operation touches
//! the filesystem while the lock is held.

use crate::data::{EntryKind, ResultEntry};
use crate::size::{AbortProbe, ProbeSnapshot};
use fnv::FnvHashMap;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<ResultEntry>,
    index: FnvHashMap<PathBuf, usize>,
    completed: usize,
    // largest completed size; pending entries count as 0
    leader: u64,
}

impl Inner {
    /// Entry indices ordered by size descending, insertion order on ties.
    fn ranked_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        // sort_by is stable, so equal sizes keep registration order
        order.sort_by(|&a, &b| self.entries[b].size.cmp(&self.entries[a].size));
        order
    }
}

/// Shared registry of sizing results, keyed by target path.
#[derive(Debug, Default)]
pub struct ResultRegistry {
    inner: Mutex<Inner>,
}

impl ResultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending entry for `path`.
    ///
    /// Returns `false` if the path was already registered; the existing
    /// entry is left untouched.
    pub fn add_target(&self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let mut inner = self.inner.lock();
        if inner.index.contains_key(&path) {
            return false;
        }
        let slot = inner.entries.len();
        inner.index.insert(path.clone(), slot);
        inner.entries.push(ResultEntry::pending(path));
        true
    }

    /// Records the outcome of a sizing computation.
    ///
    /// Applies only on the first call for a given path. Later calls, and
    /// calls for paths that were never registered, are ignored and return
    /// `false`.
    pub fn complete(
        &self,
        path: &Path,
        size: u64,
        is_partial: bool,
        elapsed: Duration,
        kind: EntryKind,
    ) -> bool {
        let mut inner = self.inner.lock();
        let Some(&slot) = inner.index.get(path) else {
            return false;
        };
        let entry = &mut inner.entries[slot];
        if entry.calculated {
            return false;
        }
        entry.size = size;
        entry.is_partial = is_partial;
        entry.elapsed = elapsed;
        entry.kind = Some(kind);
        entry.calculated = true;
        inner.completed += 1;
        inner.leader = inner.leader.max(size);
        true
    }

    /// Returns up to `n` entries ranked by size, largest first.
    ///
    /// Pending entries rank with size 0 and can be told apart by their
    /// `calculated` flag.
    pub fn top_n(&self, n: usize) -> Vec<ResultEntry> {
        let inner = self.inner.lock();
        inner
            .ranked_indices()
            .into_iter()
            .take(n)
            .map(|i| inner.entries[i].clone())
            .collect()
    }

    /// Returns every entry, ranked the same way as [`top_n`](Self::top_n).
    pub fn snapshot(&self) -> Vec<ResultEntry> {
        self.top_n(usize::MAX)
    }

    /// Registered target paths in registration order.
    pub fn targets(&self) -> Vec<PathBuf> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|e| e.path.clone())
            .collect()
    }

    /// Paths whose computation has not written a result yet.
    pub fn pending_targets(&self) -> Vec<PathBuf> {
        self.inner
            .lock()
            .entries
            .iter()
            .filter(|e| !e.calculated)
            .map(|e| e.path.clone())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        let inner = self.inner.lock();
        inner.completed == inner.entries.len()
    }

    pub fn total_targets(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn completed_targets(&self) -> usize {
        self.inner.lock().completed
    }

    /// Number of completed entries whose size is an undercount.
    pub fn partial_count(&self) -> usize {
        self.inner
            .lock()
            .entries
            .iter()
            .filter(|e| e.calculated && e.is_partial)
            .count()
    }
}

impl AbortProbe for ResultRegistry {
    fn probe(&self) -> ProbeSnapshot {
        let inner = self.inner.lock();
        ProbeSnapshot {
            pending: inner.entries.len() - inner.completed,
            leader_size: inner.leader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn done(registry: &ResultRegistry, path: &str, size: u64) -> bool {
        registry.complete(
            Path::new(path),
            size,
            false,
            Duration::from_millis(1),
            EntryKind::File,
        )
    }

    #[test]
    fn test_add_target_rejects_duplicates() {
        let registry = ResultRegistry::new();
        assert!(registry.add_target("/a"));
        assert!(!registry.add_target("/a"));
        assert_eq!(registry.total_targets(), 1);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let registry = ResultRegistry::new();
        registry.add_target("/a");

        assert!(done(&registry, "/a", 10));
        assert!(!done(&registry, "/a", 99));

        let top = registry.top_n(1);
        assert_eq!(top[0].size, 10);
        assert_eq!(registry.completed_targets(), 1);
    }

    #[test]
    fn test_complete_unknown_path_is_ignored() {
        let registry = ResultRegistry::new();
        registry.add_target("/a");
        assert!(!done(&registry, "/missing", 10));
        assert_eq!(registry.completed_targets(), 0);
    }

    #[test]
    fn test_top_n_orders_by_size_with_insertion_tiebreak() {
        let registry = ResultRegistry::new();
        for p in ["/a", "/b", "/c", "/d"] {
            registry.add_target(p);
        }
        done(&registry, "/a", 10);
        done(&registry, "/b", 20);
        done(&registry, "/c", 10);

        let top: Vec<_> = registry
            .top_n(4)
            .into_iter()
            .map(|e| (e.path, e.size, e.calculated))
            .collect();
        assert_eq!(
            top,
            vec![
                (PathBuf::from("/b"), 20, true),
                (PathBuf::from("/a"), 10, true),
                (PathBuf::from("/c"), 10, true),
                (PathBuf::from("/d"), 0, false),
            ]
        );
        assert_eq!(registry.top_n(2).len(), 2);
    }

    #[test]
    fn test_is_complete() {
        let registry = ResultRegistry::new();
        assert!(registry.is_complete());

        registry.add_target("/a");
        registry.add_target("/b");
        assert!(!registry.is_complete());

        done(&registry, "/a", 1);
        assert!(!registry.is_complete());
        assert_eq!(registry.pending_targets(), vec![PathBuf::from("/b")]);
        done(&registry, "/b", 1);
        assert!(registry.is_complete());
        assert!(registry.pending_targets().is_empty());
    }

    #[test]
    fn test_probe_reports_pending_and_leader() {
        let registry = ResultRegistry::new();
        registry.add_target("/a");
        registry.add_target("/b");
        registry.add_target("/c");
        done(&registry, "/a", 40);

        let snapshot = registry.probe();
        assert_eq!(snapshot.pending, 2);
        assert_eq!(snapshot.leader_size, 40);
    }

    #[test]
    fn test_partial_count() {
        let registry = ResultRegistry::new();
        registry.add_target("/a");
        registry.add_target("/b");
        registry.complete(
            Path::new("/a"),
            5,
            true,
            Duration::ZERO,
            EntryKind::Dir,
        );
        done(&registry, "/b", 5);
        assert_eq!(registry.partial_count(), 1);
    }

    #[test]
    fn test_concurrent_completion_counts_each_target_once() {
        let registry = Arc::new(ResultRegistry::new());
        let paths: Vec<String> = (0..64).map(|i| format!("/t{i}")).collect();
        for p in &paths {
            registry.add_target(p.as_str());
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let paths = paths.clone();
                thread::spawn(move || {
                    for (i, p) in paths.iter().enumerate() {
                        done(&registry, p, i as u64);
                        let completed = registry.completed_targets();
                        assert!(completed <= registry.total_targets());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(registry.completed_targets(), 64);
        assert!(registry.is_complete());
        let top = registry.top_n(64);
        assert!(top.windows(2).all(|w| w[0].size >= w[1].size));
    }
}
