//! Core lap-timing logic for timechart.
//!
//! This crate contains the fundamental types and logic for:
//! - Registry: optional driver metadata keyed by three-letter code
//! - Timing: parsing a timing file into per-driver lap sequences
//! - Summary: ranking drivers and computing session-wide statistics

mod error;
pub mod registry;
pub mod summary;
pub mod timing;

pub use error::{ParseError, RegistryError};
pub use registry::{DriverRecord, DriverRegistry, MalformedRecord, RegistryLoad};
pub use summary::{FastestLap, Report, Standing, summarize};
pub use timing::{Driver, ParseWarning, Session};
