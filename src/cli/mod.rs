//! Command-line parsing for the metals dashboard CLI.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the store/derivation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Metal;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "metals", version, about = "Gold & silver term-structure dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest a daily feed CSV (file or URL) into the store.
    Ingest(IngestArgs),
    /// Derive and print the dashboard from the store; optionally export JSON.
    Report(ReportArgs),
    /// Print one metal's stored front-curve history.
    History(HistoryArgs),
    /// Print store health counts (dates, rows per date/metal).
    Validate(StoreArgs),
}

/// Store location, shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct StoreArgs {
    /// Path of the JSON store file (env: METALS_STORE).
    #[arg(long, env = "METALS_STORE", default_value = "metals-store.json")]
    pub store: PathBuf,
}

#[derive(Debug, Parser)]
pub struct IngestArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Feed CSV file to ingest.
    #[arg(long, value_name = "PATH", conflicts_with = "url")]
    pub csv: Option<PathBuf>,

    /// Feed CSV URL to fetch and ingest (env: METALS_CSV_URL).
    #[arg(long, env = "METALS_CSV_URL", value_name = "URL")]
    pub url: Option<String>,
}

#[derive(Debug, Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Calendar-day lookback window for stress streaks and momentum.
    #[arg(long, default_value_t = 60)]
    pub lookback_days: i64,

    /// Momentum lookback (observation days).
    #[arg(long, default_value_t = 5)]
    pub momentum_lookback: usize,

    /// Momentum noise threshold (percent).
    #[arg(long, default_value_t = 0.5)]
    pub momentum_noise_pct: f64,

    /// Export the dashboard JSON payload to a file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Which metal to print.
    #[arg(long, value_enum, default_value_t = Metal::Gold)]
    pub metal: Metal,

    /// Day window ending at the latest stored date (clamped to 10..=365).
    #[arg(long, default_value_t = 90)]
    pub days: i64,

    /// Comma-separated tenors (months) to include.
    #[arg(long, value_delimiter = ',', default_values_t = [0, 1, 2, 3, 4, 5, 12])]
    pub tenors: Vec<u32>,
}
