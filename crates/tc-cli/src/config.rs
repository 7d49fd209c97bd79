//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Registry file consulted in the working directory when nothing else is set.
pub const DEFAULT_REGISTRY_FILE: &str = "f1_drivers.txt";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the driver registry file. Relative paths resolve against the
    /// working directory.
    pub registry_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from(DEFAULT_REGISTRY_FILE),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables (TC_*)
        figment = figment.merge(Env::prefixed("TC_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for timechart.
///
/// On Linux: `~/.config/timechart`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timechart"))
}
