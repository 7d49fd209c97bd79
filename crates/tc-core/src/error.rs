//! Error types for loading registry and timing files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the driver registry.
///
/// Callers normally downgrade this to a warning and continue without
/// enrichment (see [`crate::DriverRegistry::load_or_empty`]).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file does not exist.
    #[error("driver registry {} not found", path.display())]
    NotFound { path: PathBuf },
    /// The registry file exists but could not be read.
    #[error("failed to read driver registry {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to load the timing file. Fatal for the run.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The timing file does not exist.
    #[error("timing file {} not found", path.display())]
    TimingFileMissing { path: PathBuf },
    /// The timing file exists but could not be read.
    #[error("failed to read timing file {}", path.display())]
    TimingFileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    pub(crate) fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::TimingFileMissing { path }
        } else {
            Self::TimingFileUnreadable { path, source }
        }
    }
}

impl RegistryError {
    pub(crate) fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Unreadable { path, source }
        }
    }
}
