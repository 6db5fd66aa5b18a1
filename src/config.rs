//! Runtime configuration with validation.
//!
//! [`ScanConfig`] is what the scanner actually runs on. It is built from the
//! parsed [`Args`] and checked once up front, so the core never has to deal
//! with nonsensical parameters.

use crate::cli::Args;
use crate::exclude::ExclusionFilter;
use crate::size::{SizeEngine, SizeMode};
use crate::thread_pool::ThreadPoolStrategy;
use crate::utils::normalize_path;
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::time::Duration;

/// Highest redraw rate accepted
const MAX_FPS: u32 = 60;

/// System locations skipped unless `--no-default-excludes` is given.
#[cfg(windows)]
pub const DEFAULT_EXCLUDES: &[&str] = &[
    r"C:\Windows",
    r"C:\ProgramData",
    r"C:\$Recycle.Bin",
    r"C:\System Volume Information",
    r"C:\Recovery",
    r"C:\pagefile.sys",
    r"C:\hiberfil.sys",
];

/// System locations skipped unless `--no-default-excludes` is given.
#[cfg(not(windows))]
pub const DEFAULT_EXCLUDES: &[&str] = &["/proc", "/sys", "/dev", "/run"];

/// Validated parameters for one run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub max_depth: usize,
    pub excludes: Vec<PathBuf>,
    pub budget: Duration,
    pub top: usize,
    pub fps: u32,
    pub size_mode: SizeMode,
    pub strategy: ThreadPoolStrategy,
    pub threads: Option<usize>,
}

impl ScanConfig {
    /// Builds and validates the configuration from CLI arguments.
    ///
    /// # Errors
    /// Returns an error if the root does not exist, or if the budget, the
    /// display count or the redraw rate is out of range.
    pub fn from_args(args: &Args) -> Result<Self> {
        std::fs::metadata(&args.path)
            .with_context(|| format!("Cannot access scan root '{}'", args.path.display()))?;
        let root = normalize_path(&args.path).context("Cannot resolve scan root")?;

        if args.budget == 0 {
            bail!("--budget must be at least 1 second");
        }
        if args.top == 0 {
            bail!("--top must be at least 1");
        }
        if args.fps == 0 || args.fps > MAX_FPS {
            bail!("--fps must be between 1 and {MAX_FPS}");
        }

        let mut excludes: Vec<PathBuf> = if args.no_default_excludes {
            Vec::new()
        } else {
            DEFAULT_EXCLUDES.iter().map(PathBuf::from).collect()
        };
        excludes.extend(args.exclude.iter().cloned());

        Ok(Self {
            root,
            max_depth: args.depth,
            excludes,
            budget: Duration::from_secs(args.budget),
            top: args.top,
            fps: args.fps,
            size_mode: if args.disk_usage {
                SizeMode::DiskUsage
            } else {
                SizeMode::Apparent
            },
            strategy: args.threads_strategy,
            threads: args.threads,
        })
    }

    pub fn exclusion_filter(&self) -> ExclusionFilter {
        ExclusionFilter::new(&self.excludes)
    }

    pub fn size_engine(&self) -> SizeEngine {
        SizeEngine::new(self.budget, self.size_mode)
    }

    /// Time between two redraws of the live ranking.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps))
    }
}
