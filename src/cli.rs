//! CLI interface definitions for the `duwiz` application.
//!
//! This module defines command-line arguments using [`clap`] and exposes:
//!
//! - [`Args`]: the main struct parsed from CLI inputs
//! - [`CsvEntry`]: one exported row of the final ranking
//!
//! `Args` is turned into a validated [`ScanConfig`](crate::config::ScanConfig)
//! before any work starts.
//!
//! # Example
//!
//! ```bash
//! duwiz /home --depth 2 --top 20 --budget 30 --exclude /home/shared --output top.csv
//! ```

use crate::thread_pool::ThreadPoolStrategy;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the `duwiz` live size ranking.
#[derive(Parser, Debug, Clone)]
#[command(name = "duwiz", version, about)]
pub struct Args {
    /// Path to scan (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Depth at which directories are sized as a whole
    #[arg(long, default_value_t = 3)]
    pub depth: usize,

    /// Number of entries to display
    #[arg(long, default_value_t = 16)]
    pub top: usize,

    /// Seconds a directory may be sized before it becomes eligible to stop early
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub budget: u64,

    /// Redraws per second of the live ranking
    #[arg(long, default_value_t = 2)]
    pub fps: u32,

    /// Exclude paths under these prefixes (case-insensitive)
    #[arg(long, value_name = "PREFIX", num_args = 1.., action = clap::ArgAction::Append)]
    pub exclude: Vec<PathBuf>,

    /// Do not apply the built-in list of system paths to skip
    #[arg(long, default_value_t = false)]
    pub no_default_excludes: bool,

    /// Measure allocated disk blocks instead of apparent file length
    #[arg(long, default_value_t = false)]
    pub disk_usage: bool,

    /// How size computations are scheduled
    #[arg(long = "threads-strategy", value_enum, default_value_t = ThreadPoolStrategy::Unbounded)]
    pub threads_strategy: ThreadPoolStrategy,

    /// Worker count for the `fixed` strategy
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Write the final ranking to a CSV file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable performance profiling and show timing summary
    #[arg(long, default_value_t = false)]
    pub profile: bool,

    /// Show debug logging on stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// A single record of output (used for CSV serialization).
///
/// # Fields
/// * `rank` - 1-based position in the ranking
/// * `entry_type` - "DIR", "FILE" or "OTHER"
/// * `size_bytes` - Size in bytes
/// * `size_human` - Human-readable size (e.g., "1.2 GB")
/// * `partial` - Whether the size is a lower bound
/// * `elapsed_ms` - Time spent sizing the entry
/// * `path` - Full path to the file or directory
#[derive(Debug, serde::Serialize)]
pub struct CsvEntry {
    pub rank: usize,
    pub entry_type: String,
    pub size_bytes: u64,
    pub size_human: String,
    pub partial: bool,
    pub elapsed_ms: u64,
    pub path: String,
}
