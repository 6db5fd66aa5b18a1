//! CSV output formatter for the final ranking.
//!
//! This module exports the ranked entries for further processing or
//! analysis once every target has been sized.

use crate::cli::CsvEntry;
use crate::data::{EntryKind, ResultEntry};
use anyhow::{Context, Result};
use csv::Writer;
use humansize::{DECIMAL, format_size};
use std::io;

/// Converts a ranked entry to its CSV row.
pub fn to_row(rank: usize, entry: &ResultEntry) -> CsvEntry {
    CsvEntry {
        rank,
        entry_type: entry.kind.unwrap_or(EntryKind::Other).as_str().into(),
        size_bytes: entry.size,
        size_human: format_size(entry.size, DECIMAL),
        partial: entry.is_partial,
        elapsed_ms: entry.elapsed.as_millis() as u64,
        path: entry.path.display().to_string(),
    }
}

/// Renders ranked entries as CSV.
///
/// # Arguments
/// * `entries` - Entries in ranking order, largest first
/// * `writer` - Destination (a file or stdout)
///
/// # Note
/// This function contains no business logic: ranking and truncation happen
/// in the registry before it is called.
pub fn render<W: io::Write>(entries: &[ResultEntry], writer: W) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);

    for (i, entry) in entries.iter().enumerate() {
        csv_writer
            .serialize(to_row(i + 1, entry))
            .context("Failed to write CSV row")?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}
