//! Performance metrics and profiling utilities for `duwiz`.
//!
//! This module provides:
//! - [`PhaseTimer`] - A wrapper around `Instant` for timing the collection
//!   and sizing phases
//! - [`rss_after_phase`] - Optional memory usage tracking using `sysinfo`
//! - [`ProfileData`] - Structured data for performance metrics
//! - [`print_profile_summary`] - Terminal output for profiling results
//! - [`save_stats_json`] - JSON output for scripting integration
//!
//! # Usage
//!
//! ```rust
//! use duwiz::metrics::{PhaseTimer, rss_after_phase, ProfileData};
//!
//! let mut profile = ProfileData::new();
//! let timer = PhaseTimer::new("Collect");
//!
//! // ... do work ...
//!
//! profile.add_phase(timer.finish());
//! profile.memory_peak = rss_after_phase();
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sysinfo::{Pid, System};

/// A timer for measuring the duration of a specific phase or operation.
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    /// The name of the phase being timed
    pub name: String,
    /// The start time of the phase
    pub start: Instant,
}

impl PhaseTimer {
    /// Creates a new timer and starts timing the specified phase.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Finishes timing the phase and returns the elapsed duration.
    pub fn finish(self) -> PhaseResult {
        PhaseResult {
            name: self.name,
            duration: self.start.elapsed(),
        }
    }
}

/// The result of a completed phase timing operation.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseResult {
    /// The name of the phase that was timed
    pub name: String,
    /// The duration of the phase
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Serializes a `Duration` as whole milliseconds.
pub mod duration_serde {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

/// Profiling data for a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileData {
    /// Timing results for each phase of the run
    pub phases: Vec<PhaseResult>,
    /// Peak memory usage in bytes (if available)
    pub memory_peak: Option<u64>,
    /// Number of targets sized
    pub targets: usize,
    /// Number of targets reported as partial
    pub partial: usize,
    /// Additional metadata about the run
    pub metadata: BTreeMap<String, String>,
}

impl ProfileData {
    /// Creates a new empty profile data structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a completed phase result to the profile.
    pub fn add_phase(&mut self, phase: PhaseResult) {
        self.phases.push(phase);
    }

    /// Records target totals for the profile.
    pub fn set_target_stats(&mut self, targets: usize, partial: usize) {
        self.targets = targets;
        self.partial = partial;
    }

    /// Adds a metadata entry to the profile.
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Gets the total duration of all phases combined.
    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

/// Measures the current process's RSS (Resident Set Size) memory usage.
///
/// # Returns
/// The current RSS in bytes, or `None` if `sysinfo` cannot see the process
/// on this platform.
pub fn rss_after_phase() -> Option<u64> {
    let pid = Pid::from(std::process::id() as usize);
    let mut system = System::new();
    if !system.refresh_process(pid) {
        return None;
    }
    system.process(pid).map(|process| process.memory())
}

/// Prints a formatted profile summary to the terminal.
///
/// # Example Output
/// ```text
/// Phase timings
///   Collect             12 ms
///   Size              3400 ms
/// Targets:          118 (2 partial)
/// Memory peak:      42.0 MB
/// ```
pub fn print_profile_summary(profile: &ProfileData) {
    println!("\nPhase timings");

    for phase in &profile.phases {
        println!("  {:<15} {:>7} ms", phase.name, phase.duration.as_millis());
    }

    println!(
        "Targets:          {} ({} partial)",
        profile.targets, profile.partial
    );

    if let Some(memory_peak) = profile.memory_peak {
        let memory_mb = memory_peak as f64 / (1024.0 * 1024.0);
        println!("Memory peak:      {:.1} MB", memory_mb);
    }

    if !profile.metadata.is_empty() {
        println!("\nAdditional metrics:");
        for (key, value) in &profile.metadata {
            println!("  {:<15} {}", key, value);
        }
    }

    println!();
}

/// Saves profiling statistics as `stats.json` next to `output_path`.
///
/// # Returns
/// The path of the written stats file.
pub fn save_stats_json(output_path: &Path, profile: &ProfileData) -> Result<PathBuf> {
    let stats_path = output_path.with_file_name("stats.json");

    let stats = serde_json::json!({
        "phases": profile.phases,
        "total_duration_ms": profile.total_duration().as_millis() as u64,
        "memory_peak_bytes": profile.memory_peak,
        "targets": profile.targets,
        "partial": profile.partial,
        "metadata": profile.metadata,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    let body = serde_json::to_string_pretty(&stats).context("Failed to encode stats")?;
    std::fs::write(&stats_path, body)
        .with_context(|| format!("Failed to write {}", stats_path.display()))?;

    Ok(stats_path)
}

/// Times a block of code, returning `(result, PhaseResult)`.
///
/// # Example
/// ```rust
/// use duwiz::time_phase;
///
/// let (result, timing) = time_phase!("Collect", {
///     42
/// });
/// assert_eq!(result, 42);
/// assert_eq!(timing.name, "Collect");
/// ```
#[macro_export]
macro_rules! time_phase {
    ($name:expr, $code:block) => {{
        let timer = $crate::metrics::PhaseTimer::new($name);
        let result = $code;
        let timing = timer.finish();
        (result, timing)
    }};
}
