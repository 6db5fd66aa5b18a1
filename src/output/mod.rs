//! Output formatters for the `duwiz` application.
//!
//! # Available Formatters
//!
//! - **Terminal**: Live, in-place redrawn ranking with a progress line
//! - **CSV**: Machine-readable export of the final ranking
//!
//! Both read ranked [`ResultEntry`](crate::data::ResultEntry) snapshots and
//! never touch the registry's internals.

pub mod csv;
pub mod terminal;

/// CSV output renderer function.
///
/// See [`csv::render`] for full documentation.
pub use csv::render as render_csv;

/// Live frame renderer function.
///
/// See [`terminal::render_frame`] for full documentation.
pub use terminal::render_frame;
