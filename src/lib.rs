//! Library crate for duwiz
//!
//! `duwiz` finds the largest files and directory subtrees under a root path
//! and keeps a ranked list of them up to date while slow subtrees are still
//! being sized.
//!
//! # Pipeline
//!
//! 1. [`scan::collect_targets`] walks the root down to a fixed depth, skipping
//!    paths rejected by [`exclude::ExclusionFilter`], and registers every
//!    target in a [`registry::ResultRegistry`].
//! 2. [`dispatch::dispatch`] starts one size computation per target.
//! 3. Each computation runs [`size::SizeEngine`] and records its outcome once.
//! 4. A renderer polls the registry's read surface (`top_n`, counters,
//!    `is_complete`) until every target is done.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Validated runtime configuration
//! - [`data`]: Core result types (`ResultEntry`, `EntryKind`)
//! - [`dispatch`]: Per-target fan-out of size computations
//! - [`exclude`]: Prefix-based path deny-list
//! - [`metrics`]: Phase timing and profiling output
//! - [`output`]: Live terminal frames and CSV export
//! - [`registry`]: Thread-safe ranked result store
//! - [`scan`]: Target selection and collection
//! - [`size`]: Time-boxed size computation
//! - [`thread_pool`]: Scheduling strategies for the sizing phase
//! - [`utils`]: Path and metadata helpers

pub mod cli;
pub mod config;
pub mod data;
pub mod dispatch;
pub mod exclude;
pub mod metrics;
pub mod output;
pub mod registry;
pub mod scan;
pub mod size;
pub mod thread_pool;
pub mod utils;

pub use cli::Args;
pub use config::ScanConfig;
pub use data::{EntryKind, ResultEntry};
pub use registry::ResultRegistry;
pub use size::{SizeEngine, SizeMode};
