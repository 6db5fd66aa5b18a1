//! Size computation for a single target.
//!
//! A file target is sized from its own metadata. A directory target is sized
//! by walking its whole subtree with `WalkDir` and adding up every regular
//! file. Symbolic links are never followed and never counted. Errors on an
//! individual entry contribute zero; the walk carries on with its siblings.
//!
//! # Early termination
//!
//! Each directory walk has a wall-clock budget. Before every entry the walk
//! compares its elapsed time to the budget. Once over budget it asks its
//! [`AbortProbe`] for the global state of the run, and stops only if this
//! target is the last one still pending *and* its running total already
//! beats the largest completed size. The result is then reported as partial.
//! In every other case the walk keeps going past the budget.
//!
//! The pending count and the leader come from one locked read of the
//! registry, and a task only leaves the pending set by completing. Two
//! stragglers therefore never both see themselves as the last one.

use crate::data::EntryKind;
use crate::registry::ResultRegistry;
use crate::utils::measured_size;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Budget after which a directory walk may be stopped early.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(60);

/// How a file's size is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// The file length in bytes
    #[default]
    Apparent,
    /// Bytes allocated on disk, as reported by `du`
    DiskUsage,
}

/// A consistent read of the run's global progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSnapshot {
    /// Targets whose size is not yet recorded, including the caller's own
    pub pending: usize,
    /// Largest recorded size so far
    pub leader_size: u64,
}

impl ProbeSnapshot {
    /// Whether a computation that has accumulated `accumulated` bytes may
    /// stop now.
    pub fn permits_abort(&self, accumulated: u64) -> bool {
        self.pending == 1 && accumulated > self.leader_size
    }
}

/// Read access to the global state the early-termination check needs.
pub trait AbortProbe {
    fn probe(&self) -> ProbeSnapshot;
}

/// The result of sizing one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeOutcome {
    pub size: u64,
    pub is_partial: bool,
    pub elapsed: Duration,
    pub kind: EntryKind,
}

/// Computes target sizes under a per-target time budget.
#[derive(Debug, Clone, Copy)]
pub struct SizeEngine {
    budget: Duration,
    mode: SizeMode,
}

impl Default for SizeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET, SizeMode::default())
    }
}

impl SizeEngine {
    pub fn new(budget: Duration, mode: SizeMode) -> Self {
        Self { budget, mode }
    }

    pub fn mode(&self) -> SizeMode {
        self.mode
    }

    /// Sizes `target` and records the outcome in `registry`.
    ///
    /// This is the body of one dispatched task: the computation runs without
    /// holding any lock, and the registry is only touched to probe progress
    /// and to write the single completion.
    pub fn run(&self, target: &Path, registry: &ResultRegistry) -> SizeOutcome {
        let outcome = self.compute_size(target, registry);
        if outcome.is_partial {
            warn!(
                path = %target.display(),
                size = outcome.size,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "Stopped sizing early; reported size is a lower bound"
            );
        }
        registry.complete(
            target,
            outcome.size,
            outcome.is_partial,
            outcome.elapsed,
            outcome.kind,
        );
        outcome
    }

    /// Computes the size of `target` without recording it.
    ///
    /// Never fails: an unreadable target is sized as zero.
    pub fn compute_size<P>(&self, target: &Path, probe: &P) -> SizeOutcome
    where
        P: AbortProbe + ?Sized,
    {
        let started = Instant::now();

        let (size, is_partial, kind) = match fs::symlink_metadata(target) {
            Ok(metadata) if metadata.is_dir() => {
                let (size, is_partial) = self.directory_size(target, started, probe);
                (size, is_partial, EntryKind::Dir)
            }
            Ok(metadata) if metadata.is_file() => {
                (measured_size(&metadata, self.mode), false, EntryKind::File)
            }
            Ok(_) => (0, false, EntryKind::Other),
            Err(err) => {
                debug!(path = %target.display(), error = %err, "Cannot stat target");
                (0, false, EntryKind::Other)
            }
        };

        SizeOutcome {
            size,
            is_partial,
            elapsed: started.elapsed(),
            kind,
        }
    }

    fn directory_size<P>(&self, dir: &Path, started: Instant, probe: &P) -> (u64, bool)
    where
        P: AbortProbe + ?Sized,
    {
        let mut total: u64 = 0;
        let mut entries = WalkDir::new(dir).min_depth(1).follow_links(false).into_iter();

        loop {
            if started.elapsed() >= self.budget && probe.probe().permits_abort(total) {
                return (total, true);
            }

            let entry = match entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    debug!(error = %err, "Skipping unreadable entry");
                    continue;
                }
                None => break,
            };

            // symlinks report their own type here and are never descended
            if !entry.file_type().is_file() {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => total = total.saturating_add(measured_size(&metadata, self.mode)),
                Err(err) => {
                    debug!(path = %entry.path().display(), error = %err, "Cannot stat entry")
                }
            }
        }

        (total, false)
    }
}
