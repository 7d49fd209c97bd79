//! Timing file parsing.
//!
//! A timing file starts with a free-text location line. Every following
//! line is a fixed-width record: a three-character driver code immediately
//! followed by a lap time in seconds, e.g. `HAM83.421`.
//!
//! Parsing is a pure fold over the text: per-line problems never abort the
//! parse and are returned alongside the [`Session`] instead of printed.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::{DriverRegistry, ParseError};

/// Width of the driver code prefix, in characters.
const CODE_WIDTH: usize = 3;

/// Lines shorter than this (after trimming) are dropped without a warning.
const MIN_RECORD_LEN: usize = CODE_WIDTH + 1;

/// Lap accumulator for a single driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    code: String,
    number: String,
    name: String,
    team: String,
    lap_times: Vec<f64>,
    fastest_lap: f64,
}

impl Driver {
    fn new(code: &str, registry: &DriverRegistry) -> Self {
        let mut driver = Self {
            code: code.to_string(),
            number: String::new(),
            name: String::new(),
            team: String::new(),
            lap_times: Vec::new(),
            fastest_lap: f64::INFINITY,
        };
        if let Some(record) = registry.get(code) {
            driver.number.clone_from(&record.number);
            driver.name.clone_from(&record.name);
            driver.team.clone_from(&record.team);
        }
        driver
    }

    fn record_lap(&mut self, lap_time: f64) {
        self.lap_times.push(lap_time);
        self.fastest_lap = self.fastest_lap.min(lap_time);
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Car number from the registry, empty if unknown.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Full name from the registry, empty if unknown.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Team from the registry, empty if unknown.
    pub fn team(&self) -> &str {
        &self.team
    }

    /// Lap times in file order.
    pub fn lap_times(&self) -> &[f64] {
        &self.lap_times
    }

    /// Minimum of [`Self::lap_times`], or infinity when no laps are recorded.
    pub const fn fastest_lap(&self) -> f64 {
        self.fastest_lap
    }

    pub fn lap_count(&self) -> usize {
        self.lap_times.len()
    }

    /// Arithmetic mean of this driver's laps.
    ///
    /// A driver is only created alongside its first lap, so the mean is
    /// always defined.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_lap(&self) -> f64 {
        self.lap_times.iter().sum::<f64>() / self.lap_times.len() as f64
    }

    /// Registry name, falling back to the driver code.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.code
        } else {
            &self.name
        }
    }

    /// Registry team, falling back to `N/A`.
    pub fn display_team(&self) -> &str {
        if self.team.is_empty() { "N/A" } else { &self.team }
    }
}

/// A non-fatal problem with one timing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// The text after the driver code is not a finite number.
    LapTimeUnparseable {
        /// 1-based line number in the timing source.
        line: usize,
        code: String,
        value: String,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LapTimeUnparseable { line, code, value } => {
                write!(f, "invalid lap time format for {code} on line {line}: {value:?}")
            }
        }
    }
}

/// Every driver's laps from one timing file.
#[derive(Debug, Clone, Default)]
pub struct Session {
    location: String,
    drivers: Vec<Driver>,
    index: HashMap<String, usize>,
    warnings: Vec<ParseWarning>,
}

impl Session {
    /// Builds a session from timing text.
    ///
    /// Drivers are enriched from `registry` once, when their code is first
    /// seen, and are kept in first-appearance order.
    pub fn parse(text: &str, registry: &DriverRegistry) -> Self {
        let mut lines = split_lines(text);
        let mut session = Self {
            location: lines.next().unwrap_or_default().trim().to_string(),
            ..Self::default()
        };

        // Line 1 is the location.
        for (idx, line) in lines.enumerate() {
            session.ingest_line(idx + 2, line.trim(), registry);
        }

        session
    }

    /// Reads and parses a timing file.
    pub fn load(path: &Path, registry: &DriverRegistry) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ParseError::from_io(path.to_path_buf(), source))?;
        let session = Self::parse(&text, registry);
        tracing::debug!(
            path = %path.display(),
            location = %session.location,
            drivers = session.drivers.len(),
            warnings = session.warnings.len(),
            "parsed timing file"
        );
        Ok(session)
    }

    fn ingest_line(&mut self, line_no: usize, line: &str, registry: &DriverRegistry) {
        if line.chars().count() < MIN_RECORD_LEN {
            return;
        }

        // Split on a char boundary; codes are not necessarily ASCII.
        let split = line
            .char_indices()
            .nth(CODE_WIDTH)
            .map_or(line.len(), |(pos, _)| pos);
        let (code, rest) = line.split_at(split);

        let Some(lap_time) = parse_lap_time(rest) else {
            self.warnings.push(ParseWarning::LapTimeUnparseable {
                line: line_no,
                code: code.to_string(),
                value: rest.to_string(),
            });
            return;
        };

        let slot = match self.index.get(code) {
            Some(&slot) => slot,
            None => {
                self.drivers.push(Driver::new(code, registry));
                self.index.insert(code.to_string(), self.drivers.len() - 1);
                self.drivers.len() - 1
            }
        };
        self.drivers[slot].record_lap(lap_time);
    }

    /// The free-text label from the first line of the file.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Drivers in order of first appearance.
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn driver(&self, code: &str) -> Option<&Driver> {
        self.index.get(code).map(|&slot| &self.drivers[slot])
    }

    /// Lines that were skipped because their lap time did not parse.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

/// Splits on `\n`, `\r\n`, and lone `\r` line endings.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Parses a lap time, allowing `_` digit separators (`8_3.421`).
fn parse_lap_time(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let value = if raw.contains('_') {
        strip_digit_separators(raw)?.parse::<f64>()
    } else {
        raw.parse::<f64>()
    };
    value.ok().filter(|value| value.is_finite())
}

/// Removes underscores that sit between two digits; any other underscore
/// makes the value invalid.
fn strip_digit_separators(raw: &str) -> Option<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut cleaned = String::with_capacity(raw.len());
    for (idx, &c) in chars.iter().enumerate() {
        if c != '_' {
            cleaned.push(c);
            continue;
        }
        let after_digit = idx > 0 && chars[idx - 1].is_ascii_digit();
        let before_digit = chars.get(idx + 1).is_some_and(char::is_ascii_digit);
        if !(after_digit && before_digit) {
            return None;
        }
    }
    Some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Session {
        Session::parse(text, &DriverRegistry::default())
    }

    #[test]
    fn parses_monza_scenario() {
        let session = parse("Monza\nHAM83.421\nVER82.998\nHAM84.001\n");

        assert_eq!(session.location(), "Monza");
        assert_eq!(session.drivers().len(), 2);

        let ham = session.driver("HAM").unwrap();
        assert_eq!(ham.lap_times(), &[83.421, 84.001]);
        assert!((ham.fastest_lap() - 83.421).abs() < f64::EPSILON);

        let ver = session.driver("VER").unwrap();
        assert!((ver.fastest_lap() - 82.998).abs() < f64::EPSILON);
        assert!(session.warnings().is_empty());
    }

    #[test]
    fn drivers_keep_first_appearance_order() {
        let session = parse("Silverstone\nVER90.1\nHAM89.0\nVER88.5\nLEC91.2\n");
        let codes: Vec<_> = session.drivers().iter().map(Driver::code).collect();
        assert_eq!(codes, ["VER", "HAM", "LEC"]);
    }

    #[test]
    fn fastest_lap_is_minimum_of_laps() {
        let session = parse("Spa\nNOR105.2\nNOR103.9\nNOR104.4\nPIA104.0\nPIA103.95\n");
        for driver in session.drivers() {
            let min = driver
                .lap_times()
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            assert!((driver.fastest_lap() - min).abs() < f64::EPSILON);
            assert!(driver.fastest_lap().is_finite());
        }
    }

    #[test]
    fn short_lines_are_skipped_silently() {
        let session = parse("Monza\nXYZ\n\nHA\nHAM83.421\n");
        assert!(session.driver("XYZ").is_none());
        assert_eq!(session.drivers().len(), 1);
        assert!(session.warnings().is_empty());
    }

    #[test]
    fn unparseable_lap_time_is_warned_and_skipped() {
        let session = parse("Monza\nHAMabc\nVER82.998\n");

        assert!(session.driver("HAM").is_none());
        assert_eq!(
            session.warnings(),
            &[ParseWarning::LapTimeUnparseable {
                line: 2,
                code: "HAM".to_string(),
                value: "abc".to_string(),
            }]
        );
        assert!(session.warnings()[0].to_string().contains("HAM"));
    }

    #[test]
    fn bad_line_does_not_drop_existing_laps() {
        let session = parse("Monza\nHAM83.421\nHAM8x.1\nHAM84.0\n");
        assert_eq!(session.driver("HAM").unwrap().lap_count(), 2);
        assert_eq!(session.warnings().len(), 1);
    }

    #[test]
    fn non_finite_lap_times_are_rejected() {
        let session = parse("Monza\nHAMinf\nVERNaN\n");
        assert!(session.is_empty());
        assert_eq!(session.warnings().len(), 2);
    }

    #[test]
    fn space_between_code_and_time_is_tolerated() {
        let session = parse("Monza\nHAM 83.421\n");
        assert_eq!(session.driver("HAM").unwrap().lap_times(), &[83.421]);
    }

    #[test]
    fn carriage_return_line_endings_split_records() {
        let session = parse("Monza\rHAM83.421\rVER82.998\r");
        assert_eq!(session.location(), "Monza");
        assert_eq!(session.drivers().len(), 2);
        assert_eq!(session.driver("VER").unwrap().lap_times(), &[82.998]);
    }

    #[test]
    fn mixed_line_endings_keep_line_numbers() {
        let session = parse("Monza\r\nHAM83.421\rVERxx\nLEC84.0\n");
        assert_eq!(session.drivers().len(), 2);
        assert_eq!(
            session.warnings(),
            &[ParseWarning::LapTimeUnparseable {
                line: 3,
                code: "VER".to_string(),
                value: "xx".to_string(),
            }]
        );
    }

    #[test]
    fn digit_separators_in_lap_time_are_accepted() {
        let session = parse("Monza\nHAM8_3.421\nVER82.99_8\n");
        assert_eq!(session.driver("HAM").unwrap().lap_times(), &[83.421]);
        assert_eq!(session.driver("VER").unwrap().lap_times(), &[82.998]);
        assert!(session.warnings().is_empty());
    }

    #[test]
    fn misplaced_separators_are_unparseable() {
        let session = parse("Monza\nHAM_83.4\nVER83_.4\nLEC8__3.4\nNOR83.4_\n");
        assert!(session.is_empty());
        assert_eq!(session.warnings().len(), 4);
    }

    #[test]
    fn codes_are_case_sensitive() {
        let session = parse("Monza\nHAM83.0\nham84.0\n");
        assert_eq!(session.drivers().len(), 2);
    }

    #[test]
    fn multibyte_codes_split_on_characters() {
        let session = parse("Monza\nPÉR85.5\n");
        assert_eq!(session.driver("PÉR").unwrap().lap_times(), &[85.5]);
    }

    #[test]
    fn empty_source_has_no_location_or_drivers() {
        let session = parse("");
        assert_eq!(session.location(), "");
        assert!(session.is_empty());
    }

    #[test]
    fn location_is_trimmed() {
        let session = parse("  Monaco Grand Prix \r\nLEC72.1\r\n");
        assert_eq!(session.location(), "Monaco Grand Prix");
        assert_eq!(session.driver("LEC").unwrap().lap_times(), &[72.1]);
    }

    #[test]
    fn registry_enriches_known_codes_only() {
        let registry = DriverRegistry::parse("44,HAM,Lewis Hamilton,Mercedes\n").registry;
        let session = Session::parse("Monza\nHAM83.4\nVER82.9\n", &registry);

        let ham = session.driver("HAM").unwrap();
        assert_eq!(ham.number(), "44");
        assert_eq!(ham.display_name(), "Lewis Hamilton");
        assert_eq!(ham.display_team(), "Mercedes");

        let ver = session.driver("VER").unwrap();
        assert_eq!(ver.number(), "");
        assert_eq!(ver.display_name(), "VER");
        assert_eq!(ver.display_team(), "N/A");
    }

    #[test]
    fn enrichment_is_fixed_at_first_sighting() {
        let registry = DriverRegistry::parse("44,HAM,Lewis Hamilton,Mercedes\n").registry;
        let mut session = Session::parse("Monza\nHAM83.4\n", &registry);

        let updated = DriverRegistry::parse("44,HAM,Lewis Hamilton,Ferrari\n").registry;
        session.ingest_line(3, "HAM82.9", &updated);

        let ham = session.driver("HAM").unwrap();
        assert_eq!(ham.team(), "Mercedes");
        assert_eq!(ham.lap_count(), 2);
    }

    #[test]
    fn average_lap_is_mean_of_driver_laps() {
        let session = parse("Monza\nHAM80.0\nHAM82.0\nHAM84.0\n");
        let avg = session.driver("HAM").unwrap().average_lap();
        assert!((avg - 82.0).abs() < 1e-9);
    }

    #[test]
    fn load_missing_file_is_timing_file_missing() {
        let temp = tempfile::tempdir().unwrap();
        let err = Session::load(&temp.path().join("laps.txt"), &DriverRegistry::default())
            .unwrap_err();
        assert!(matches!(err, ParseError::TimingFileMissing { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("laps.txt");
        std::fs::write(&path, "Monza\nHAM83.421\n").unwrap();

        let session = Session::load(&path, &DriverRegistry::default()).unwrap();
        assert_eq!(session.location(), "Monza");
        assert_eq!(session.drivers().len(), 1);
    }
}
