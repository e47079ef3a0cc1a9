//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads/saves the observation store
//! - runs the derivation pipeline
//! - prints reports and writes optional exports

use chrono::Duration;
use clap::Parser;

use crate::cli::{Cli, Command, HistoryArgs, IngestArgs, ReportArgs, StoreArgs};
use crate::error::AppError;
use crate::store::{MemoryStore, ObservationStore};

pub mod pipeline;

/// Entry point for the `metals` binary.
pub fn run() -> Result<(), AppError> {
    // Load .env so METALS_CSV_URL / METALS_STORE work without exporting.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Ingest(args) => handle_ingest(args),
        Command::Report(args) => handle_report(args),
        Command::History(args) => handle_history(args),
        Command::Validate(args) => handle_validate(args),
    }
}

fn handle_ingest(args: IngestArgs) -> Result<(), AppError> {
    let feed = match (&args.csv, &args.url) {
        (Some(path), _) => crate::io::parse_feed_file(path)?,
        (None, Some(url)) => crate::io::fetch_feed_url(url)?,
        (None, None) => {
            return Err(AppError::usage(
                "Nothing to ingest: pass --csv PATH or --url URL (or set METALS_CSV_URL).",
            ));
        }
    };

    let mut store = MemoryStore::load(&args.store.store)?;
    let outcome = store.ingest(&feed.rows);
    store.save(&args.store.store)?;

    print!("{}", crate::report::format_ingest(&feed, &outcome));
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let store = MemoryStore::load(&args.store.store)?;
    let opts = pipeline::DashboardOptions {
        lookback_days: args.lookback_days,
        momentum_lookback: args.momentum_lookback,
        momentum_noise_pct: args.momentum_noise_pct,
    };

    let run = pipeline::run_dashboard(&store, &opts)?;
    print!("{}", crate::report::format_dashboard(&run));

    if let Some(path) = &args.export {
        crate::io::write_dashboard_json(path, &run.view)?;
    }
    Ok(())
}

fn handle_history(args: HistoryArgs) -> Result<(), AppError> {
    let store = MemoryStore::load(&args.store.store)?;
    let latest = store
        .latest_date()
        .ok_or_else(|| AppError::no_data("Store is empty. Run `metals ingest` first."))?;

    let days = args.days.clamp(10, 365);
    let from = latest - Duration::days(days - 1);
    let rows: Vec<_> = store
        .observations_in_range(args.metal, from, latest)
        .into_iter()
        .filter(|r| args.tenors.contains(&r.tenor_months))
        .collect();

    print!("{}", crate::report::format_history(args.metal, &rows));
    Ok(())
}

fn handle_validate(args: StoreArgs) -> Result<(), AppError> {
    let store = MemoryStore::load(&args.store)?;
    print!("{}", crate::report::format_validate(&store));
    Ok(())
}
