//! Fan-out of size computations, one per registered target.
//!
//! [`dispatch`] reads the frozen target list from the registry and starts an
//! independent computation for each entry. Every computation writes its
//! outcome back through [`ResultRegistry::complete`] exactly once.
//!
//! The returned [`DispatchHandle`] is the second exit gate: the registry
//! may already report every entry as calculated while threads are still
//! unwinding, and the caller must [`join`](DispatchHandle::join) before the
//! process exits. If the fan-out fails halfway, every thread that did start
//! is joined before the error is returned.

use crate::registry::ResultRegistry;
use crate::size::SizeEngine;
use crate::thread_pool::{ThreadPoolStrategy, build_pool};
use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};

/// Joinable handle over every launched computation.
#[derive(Debug)]
pub struct DispatchHandle {
    workers: Vec<JoinHandle<()>>,
    targets: usize,
}

impl DispatchHandle {
    /// Number of computations that were launched.
    pub fn targets(&self) -> usize {
        self.targets
    }

    /// True once every launched thread has exited.
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(|w| w.is_finished())
    }

    /// True when there is nothing left to wait for: either every entry is
    /// calculated, or every thread has exited and the remaining entries
    /// will never be.
    pub fn is_settled(&self, registry: &ResultRegistry) -> bool {
        registry.is_complete() || self.is_finished()
    }

    /// Waits for every launched computation.
    ///
    /// # Returns
    /// The number of worker threads that panicked.
    pub fn join(self) -> usize {
        let mut panicked = 0;
        for worker in self.workers {
            let name = worker.thread().name().unwrap_or("unnamed").to_string();
            if worker.join().is_err() {
                warn!(thread = %name, "Sizing thread panicked");
                panicked += 1;
            }
        }
        panicked
    }
}

/// Launches one size computation per registered target.
///
/// # Arguments
/// * `registry` - Registry whose target set is final
/// * `engine` - Shared sizing configuration
/// * `strategy` - Thread-per-target or a bounded rayon pool
/// * `n_threads` - Worker count for `ThreadPoolStrategy::Fixed`
///
/// # Errors
/// Returns an error if the strategy is misconfigured or a thread cannot be
/// spawned.
pub fn dispatch(
    registry: &Arc<ResultRegistry>,
    engine: SizeEngine,
    strategy: ThreadPoolStrategy,
    n_threads: Option<usize>,
) -> Result<DispatchHandle> {
    let targets = registry.targets();
    let count = targets.len();

    let workers = match strategy.worker_count(n_threads)? {
        None => {
            info!(targets = count, "Sizing with one thread per target");
            spawn_per_target(registry, engine, targets)?
        }
        Some(workers) => {
            info!(
                targets = count,
                workers,
                strategy = strategy.as_str(),
                "Sizing on a thread pool"
            );
            vec![spawn_pooled(registry, engine, targets, workers)?]
        }
    };

    Ok(DispatchHandle {
        workers,
        targets: count,
    })
}

fn spawn_per_target(
    registry: &Arc<ResultRegistry>,
    engine: SizeEngine,
    targets: Vec<PathBuf>,
) -> Result<Vec<JoinHandle<()>>> {
    spawn_all(targets, |i, target| {
        let registry = Arc::clone(registry);
        thread::Builder::new()
            .name(format!("duwiz-size-{i}"))
            .spawn(move || {
                engine.run(&target, &registry);
            })
    })
}

/// Spawns one thread per item through `spawn`.
///
/// On the first spawn failure the threads already started are joined, so
/// no computation outlives the returned error.
fn spawn_all<T, F>(items: Vec<T>, mut spawn: F) -> Result<Vec<JoinHandle<()>>>
where
    F: FnMut(usize, T) -> io::Result<JoinHandle<()>>,
{
    let mut workers = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match spawn(i, item) {
            Ok(worker) => workers.push(worker),
            Err(err) => {
                error!(
                    started = workers.len(),
                    error = %err,
                    "Thread spawn failed; waiting for started computations"
                );
                let panicked = DispatchHandle {
                    targets: workers.len(),
                    workers,
                }
                .join();
                if panicked > 0 {
                    warn!(panicked, "Some sizing threads panicked");
                }
                return Err(err).with_context(|| format!("Failed to spawn sizing thread #{i}"));
            }
        }
    }
    Ok(workers)
}

/// Runs every computation on a dedicated pool, coordinated from one thread
/// so the caller still gets a single joinable handle.
fn spawn_pooled(
    registry: &Arc<ResultRegistry>,
    engine: SizeEngine,
    targets: Vec<PathBuf>,
    workers: usize,
) -> Result<JoinHandle<()>> {
    let pool = build_pool(workers)?;
    let registry = Arc::clone(registry);

    thread::Builder::new()
        .name("duwiz-pool".to_string())
        .spawn(move || {
            pool.scope(|scope| {
                for target in &targets {
                    let registry = &registry;
                    scope.spawn(move |_| {
                        engine.run(target, registry);
                    });
                }
            });
        })
        .context("Failed to spawn pool coordinator")
}
