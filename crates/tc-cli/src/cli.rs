//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Lap timing report.
///
/// Reads a timing file (location on the first line, then one
/// `CODE<lap seconds>` record per line) and prints each driver's fastest
/// and average lap.
#[derive(Debug, Parser)]
#[command(name = "timechart", version, about, long_about = None)]
pub struct Cli {
    /// Path to the timing file.
    pub timing_file: PathBuf,

    /// Driver registry file (`number,code,name,team` per line).
    ///
    /// Overrides the configured `registry_path`.
    #[arg(short, long)]
    pub registry: Option<PathBuf>,

    /// Output the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
