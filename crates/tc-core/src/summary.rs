//! Session summary: fastest lap, overall average, and ranked standings.
//!
//! # Tie-breaks
//!
//! Standings are a stable sort on fastest lap over drivers in
//! first-appearance order. Drivers with equal fastest laps keep that order,
//! and the fastest-overall driver is the first of them.

use serde::Serialize;

use crate::{Driver, Session};

/// The single quickest lap in a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastestLap {
    pub code: String,
    /// Registry name, or the code when unknown.
    pub name: String,
    pub lap_time: f64,
}

/// One row of the ranked results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based rank by fastest lap.
    pub position: usize,
    pub code: String,
    pub number: String,
    /// Registry name, or the code when unknown.
    pub name: String,
    /// Registry team, or `N/A` when unknown.
    pub team: String,
    pub fastest_lap: f64,
    pub average_lap: f64,
    pub lap_count: usize,
}

/// Read-only summary of a parsed [`Session`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub location: String,
    /// `None` when the session has no drivers.
    pub fastest: Option<FastestLap>,
    /// Mean of every lap across all drivers, `None` without laps.
    pub overall_average: Option<f64>,
    pub standings: Vec<Standing>,
}

impl Report {
    /// True when there was no timing data to summarize.
    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }
}

/// Summarizes a session.
///
/// The overall average weights every lap equally, so drivers with more laps
/// contribute more samples; it is not a mean of per-driver averages.
pub fn summarize(session: &Session) -> Report {
    let mut ranked: Vec<&Driver> = session.drivers().iter().collect();
    ranked.sort_by(|a, b| a.fastest_lap().total_cmp(&b.fastest_lap()));

    let fastest = ranked.first().map(|driver| FastestLap {
        code: driver.code().to_string(),
        name: driver.display_name().to_string(),
        lap_time: driver.fastest_lap(),
    });

    let standings = ranked
        .iter()
        .enumerate()
        .map(|(idx, driver)| Standing {
            position: idx + 1,
            code: driver.code().to_string(),
            number: driver.number().to_string(),
            name: driver.display_name().to_string(),
            team: driver.display_team().to_string(),
            fastest_lap: driver.fastest_lap(),
            average_lap: driver.average_lap(),
            lap_count: driver.lap_count(),
        })
        .collect();

    Report {
        location: session.location().to_string(),
        fastest,
        overall_average: overall_average(session),
        standings,
    }
}

#[allow(clippy::cast_precision_loss)]
fn overall_average(session: &Session) -> Option<f64> {
    let (sum, count) = session
        .drivers()
        .iter()
        .flat_map(Driver::lap_times)
        .fold((0.0, 0_usize), |(sum, count), lap| (sum + lap, count + 1));
    (count > 0).then(|| sum / count as f64)
}
