//! Terminal output formatter for the live ranking.
//!
//! Each frame moves the cursor to the top-left corner and overwrites the
//! previous frame line by line, clearing whatever was left at the end of
//! each line. No full-screen clear happens between frames, so redraws do
//! not flicker.

use crate::data::ResultEntry;
use crate::registry::ResultRegistry;
use humansize::{DECIMAL, format_size};
use std::io::{self, Write};

/// Moves the cursor to the top-left corner.
const CURSOR_HOME: &str = "\x1b[H";
/// Clears from the cursor to the end of the line.
const CLEAR_LINE: &str = "\x1b[K";
/// Clears the whole screen.
const CLEAR_SCREEN: &str = "\x1b[2J";

/// Clears the screen once before the first frame.
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "{CLEAR_SCREEN}{CURSOR_HOME}")?;
    out.flush()
}

/// Formats one ranking row without the rank prefix.
///
/// Partial sizes get a `+` suffix since they are lower bounds.
pub fn format_entry(entry: &ResultEntry) -> String {
    let Some(size) = entry.known_size() else {
        return format!("{} : calculating...", entry.path.display());
    };
    format!(
        "{} : {}{} ({:.1} sec)",
        entry.path.display(),
        format_size(size, DECIMAL),
        if entry.is_partial { "+" } else { "" },
        entry.elapsed.as_secs_f64()
    )
}

/// Formats the progress line, e.g. `Progress: 3/4 (75%)`.
pub fn format_progress(completed: usize, total: usize) -> String {
    let percent = if total > 0 { completed * 100 / total } else { 0 };
    format!("Progress: {completed}/{total} ({percent}%)")
}

/// Draws one frame of the ranking from the registry's current state.
///
/// Always writes `limit` ranking lines, leaving missing rows blank, so a
/// shorter frame fully overwrites a longer one.
pub fn render_frame<W: Write>(
    out: &mut W,
    registry: &ResultRegistry,
    limit: usize,
) -> io::Result<()> {
    let completed = registry.completed_targets();
    let total = registry.total_targets();
    let entries = registry.top_n(limit);

    write!(out, "{CURSOR_HOME}")?;
    writeln!(out, "{}{CLEAR_LINE}", format_progress(completed, total))?;
    writeln!(out, "{CLEAR_LINE}")?;
    writeln!(out, "=== Top {limit} Largest Files/Folders ==={CLEAR_LINE}")?;

    for rank in 0..limit {
        match entries.get(rank) {
            Some(entry) => writeln!(out, "{}. {}{CLEAR_LINE}", rank + 1, format_entry(entry))?,
            None => writeln!(out, "{CLEAR_LINE}")?,
        }
    }
    out.flush()
}
