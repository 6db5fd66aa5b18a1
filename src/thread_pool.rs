//! Worker strategies for the sizing phase.
//!
//! By default every target gets its own OS thread, so a slow subtree never
//! waits behind another one. The bounded strategies run the same per-target
//! computations on a rayon pool instead, which keeps the thread count sane
//! when a shallow cut produces thousands of targets.
//!
//! # Strategies
//! - `Unbounded`: One thread per target
//! - `Fixed`: A fixed number of pool threads
//! - `NumCpus`: One pool thread per CPU
//! - `IoHeavy`: Two pool threads per CPU, for I/O-bound trees

use anyhow::{Context, Result};
use clap::ValueEnum;

/// Thread configuration strategies for size computation.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum ThreadPoolStrategy {
    /// One thread per target
    #[default]
    Unbounded,
    /// Use a fixed number of threads
    Fixed,
    /// One thread per CPU
    NumCpus,
    /// Optimized for I/O-heavy workloads (2x CPU count)
    IoHeavy,
}

impl ThreadPoolStrategy {
    /// Returns a string representation of the strategy for display purposes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadPoolStrategy::Unbounded => "Unbounded",
            ThreadPoolStrategy::Fixed => "Fixed",
            ThreadPoolStrategy::NumCpus => "NumCpus",
            ThreadPoolStrategy::IoHeavy => "IoHeavy",
        }
    }

    /// Number of pool workers, or `None` for one thread per target.
    ///
    /// # Arguments
    /// * `n_threads` - Requested thread count (required by `Fixed`, ignored otherwise)
    ///
    /// # Errors
    /// Returns an error if `Fixed` is requested without a positive thread count.
    pub fn worker_count(&self, n_threads: Option<usize>) -> Result<Option<usize>> {
        let workers = match self {
            ThreadPoolStrategy::Unbounded => return Ok(None),
            ThreadPoolStrategy::Fixed => match n_threads {
                Some(n) if n > 0 => n,
                _ => anyhow::bail!("Fixed strategy requires --threads N with N > 0"),
            },
            ThreadPoolStrategy::NumCpus => num_cpus::get(),
            ThreadPoolStrategy::IoHeavy => num_cpus::get() * 2,
        };
        Ok(Some(workers))
    }
}

/// Builds a dedicated rayon pool with `workers` named threads.
pub fn build_pool(workers: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("duwiz-worker-{i}"))
        .build()
        .context("Failed to configure thread pool")
}
