//! Driver registry: optional display metadata keyed by driver code.
//!
//! The registry file is plain text with one `number,code,name,team` record
//! per line. There is no header row and no escaping, so a comma inside a
//! field produces a malformed record.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::RegistryError;
use crate::timing::split_lines;

/// Number of comma-separated fields in a registry line.
const FIELD_COUNT: usize = 4;

/// Display metadata for one driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverRecord {
    pub code: String,
    pub number: String,
    pub name: String,
    pub team: String,
}

/// A registry line that did not split into exactly four fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// 1-based line number in the registry source.
    pub line: usize,
    /// Number of fields the line actually split into.
    pub field_count: usize,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "registry line {} has {} fields, expected {FIELD_COUNT}",
            self.line, self.field_count
        )
    }
}

/// Lookup table from driver code to [`DriverRecord`].
#[derive(Debug, Clone, Default)]
pub struct DriverRegistry {
    records: HashMap<String, DriverRecord>,
}

/// Result of loading a registry: the usable records plus skipped lines.
#[derive(Debug, Clone, Default)]
pub struct RegistryLoad {
    pub registry: DriverRegistry,
    pub malformed: Vec<MalformedRecord>,
}

impl DriverRegistry {
    /// Parses registry text.
    ///
    /// Blank lines are ignored. Lines with the wrong field count are
    /// skipped and reported; a later record for the same code replaces
    /// an earlier one.
    pub fn parse(text: &str) -> RegistryLoad {
        let mut records = HashMap::new();
        let mut malformed = Vec::new();

        for (idx, line) in split_lines(text).enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            let [number, code, name, team] = fields.as_slice() else {
                malformed.push(MalformedRecord {
                    line: idx + 1,
                    field_count: fields.len(),
                });
                continue;
            };

            records.insert(
                (*code).to_string(),
                DriverRecord {
                    code: (*code).to_string(),
                    number: (*number).to_string(),
                    name: (*name).to_string(),
                    team: (*team).to_string(),
                },
            );
        }

        RegistryLoad {
            registry: Self { records },
            malformed,
        }
    }

    /// Reads and parses a registry file.
    pub fn load(path: &Path) -> Result<RegistryLoad, RegistryError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| RegistryError::from_io(path.to_path_buf(), source))?;
        let loaded = Self::parse(&text);
        tracing::debug!(
            path = %path.display(),
            records = loaded.registry.len(),
            malformed = loaded.malformed.len(),
            "loaded driver registry"
        );
        Ok(loaded)
    }

    /// Loads a registry file, degrading every failure to a warning.
    ///
    /// A missing or unreadable file yields an empty registry. Malformed
    /// lines are skipped individually.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(loaded) => {
                for record in &loaded.malformed {
                    tracing::warn!(path = %path.display(), "{record}, skipping");
                }
                loaded.registry
            }
            Err(err) => {
                tracing::warn!("{err}; continuing without driver details");
                Self::default()
            }
        }
    }

    /// Returns the record for `code`, if any.
    pub fn get(&self, code: &str) -> Option<&DriverRecord> {
        self.records.get(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
