//! Main entry point for the `duwiz` CLI application.
//!
//! `duwiz` ranks the largest files and folders under a root path and keeps
//! the ranking on screen while slower folders are still being sized.
//!
//! # Responsibilities
//! - Parses CLI arguments via [`clap`] and validates them into a [`ScanConfig`]
//! - Collects targets with a progress spinner
//! - Dispatches one size computation per target
//! - Redraws the live ranking at a fixed rate until every target is sized
//! - Waits for every computation to exit before the process ends
//! - Optionally exports the final ranking to CSV and prints a profile
//!
//! Logs go to stderr so they never interleave with the live table.

use anyhow::{Context, Result};
use clap::Parser;
use duwiz::config::ScanConfig;
use duwiz::dispatch::{DispatchHandle, dispatch};
use duwiz::metrics::{
    PhaseTimer, ProfileData, print_profile_summary, rss_after_phase, save_stats_json,
};
use duwiz::output::{render_csv, render_frame, terminal};
use duwiz::registry::ResultRegistry;
use duwiz::scan::collect_targets;
use duwiz::{Args, time_phase};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Longest pause between two completion checks of the live loop.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("duwiz=debug,warn")
        } else {
            EnvFilter::new("duwiz=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Phase 1: walk the root and register every target.
fn collect_phase(config: &ScanConfig, registry: &ResultRegistry) -> Result<usize> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner} Collecting target paths... [{elapsed}]")
            .context("Failed to set progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let filter = config.exclusion_filter();
    let count = collect_targets(&config.root, config.max_depth, &filter, registry);

    pb.finish_and_clear();
    info!(
        root = %config.root.display(),
        depth = config.max_depth,
        targets = count,
        "Collected targets"
    );
    Ok(count)
}

/// Phase 3: redraw the ranking until every target is done or no sizing
/// thread is left to finish the rest.
fn display_loop(
    config: &ScanConfig,
    registry: &ResultRegistry,
    handle: &DispatchHandle,
) -> Result<()> {
    let frame_interval = config.frame_interval();
    let mut stdout = io::stdout().lock();
    terminal::clear_screen(&mut stdout)?;

    let mut last_frame: Option<Instant> = None;
    while !handle.is_settled(registry) {
        if last_frame.is_none_or(|t| t.elapsed() >= frame_interval) {
            render_frame(&mut stdout, registry, config.top).context("Failed to draw frame")?;
            last_frame = Some(Instant::now());
        }
        thread::sleep(POLL_INTERVAL.min(frame_interval));
    }

    render_frame(&mut stdout, registry, config.top).context("Failed to draw frame")?;
    if registry.is_complete() {
        writeln!(stdout, "\nAnalysis complete!")?;
    } else {
        for path in registry.pending_targets() {
            warn!(path = %path.display(), "Sizing thread exited without a result");
        }
        writeln!(stdout, "\nAnalysis incomplete.")?;
    }
    Ok(())
}

fn export_csv(args: &Args, config: &ScanConfig, registry: &ResultRegistry) -> Result<()> {
    let Some(csv_path) = &args.output else {
        return Ok(());
    };
    let file = File::create(csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;
    render_csv(&registry.top_n(config.top), file)?;
    println!("Output saved to: {}", csv_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = ScanConfig::from_args(&args)?;
    let registry = Arc::new(ResultRegistry::new());
    let mut profile = ProfileData::new();

    let (collected, timing) = time_phase!("Collect", { collect_phase(&config, &registry) });
    collected?;
    profile.add_phase(timing);

    // Phase 2: the target set is final, fan out one computation per target
    let size_timer = PhaseTimer::new("Size");
    let handle = dispatch(
        &registry,
        config.size_engine(),
        config.strategy,
        config.threads,
    )?;

    display_loop(&config, &registry, &handle)?;

    // the registry can report completion before every thread has exited
    let panicked = handle.join();
    if panicked > 0 {
        warn!(panicked, "Some sizing threads panicked");
    }
    profile.add_phase(size_timer.finish());

    export_csv(&args, &config, &registry)?;

    if args.profile {
        profile.set_target_stats(registry.total_targets(), registry.partial_count());
        profile.memory_peak = rss_after_phase();
        profile.add_metadata("strategy", config.strategy.as_str());
        profile.add_metadata("budget_secs", &config.budget.as_secs().to_string());
        print_profile_summary(&profile);
        if let Some(csv_path) = &args.output {
            let stats_path = save_stats_json(csv_path, &profile)?;
            println!("Performance stats saved to: {}", stats_path.display());
        }
    }

    Ok(())
}
