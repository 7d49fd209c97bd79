//! Report command: parse a timing file and print the ranked results.
//!
//! Output formats are human-readable text (default) and JSON (`--json`).

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tc_core::{DriverRegistry, Report, Session, summarize};

/// Width of the `=` rules under the header and table heading.
const RULE_WIDTH: usize = 50;

/// Writes the human-readable report.
pub fn write_report<W: Write>(writer: &mut W, report: &Report) -> std::io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(writer, "Formula 1 Grand Prix - {}", report.location)?;
    writeln!(writer, "{rule}")?;

    let (Some(fastest), Some(overall_average)) = (&report.fastest, report.overall_average) else {
        writeln!(writer, "No timing data available.")?;
        return Ok(());
    };

    writeln!(
        writer,
        "Fastest Lap: {} - {:.3}",
        fastest.name, fastest.lap_time
    )?;
    writeln!(writer, "Overall Average: {overall_average:.3}")?;

    writeln!(writer)?;
    writeln!(writer, "Detailed Results:")?;
    writeln!(
        writer,
        "{:<15}{:<20}{:<10}{:<10}Laps",
        "Driver", "Team", "Best Lap", "Avg Lap"
    )?;
    writeln!(writer, "{rule}")?;

    for standing in &report.standings {
        writeln!(
            writer,
            "{:<15}{:<20}{:<10.3}{:<10.3}{}",
            standing.name,
            standing.team,
            standing.fastest_lap,
            standing.average_lap,
            standing.lap_count
        )?;
    }

    Ok(())
}

/// Writes the report as pretty-printed JSON.
pub fn write_report_json<W: Write>(writer: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report).context("failed to encode report")?;
    writeln!(writer)?;
    Ok(())
}

/// Runs the report command.
///
/// A missing or unreadable registry only produces a warning; a missing or
/// unreadable timing file is an error.
pub fn run<W: Write>(
    writer: &mut W,
    timing_file: &Path,
    registry_path: &Path,
    json: bool,
) -> Result<()> {
    let registry = DriverRegistry::load_or_empty(registry_path);

    let session = Session::load(timing_file, &registry)?;
    for warning in session.warnings() {
        tracing::warn!("{warning}");
    }

    let report = summarize(&session);
    if json {
        write_report_json(writer, &report)?;
    } else {
        write_report(writer, &report).context("failed to write report")?;
    }

    Ok(())
}
