//! Environment-driven settings
//!
//! `WEBCAM_DEVICE`, `WEBCAM_RES` and `WEBCAM_OUTPUT_DIR` provide defaults
//! that command-line flags override. Empty values are treated as unset.

use std::env;
use std::path::PathBuf;

use crate::model::DEFAULT_OUTPUT_DIR;

/// Environment variable overriding device discovery
pub const ENV_DEVICE: &str = "WEBCAM_DEVICE";

/// Environment variable overriding resolution detection
pub const ENV_RESOLUTION: &str = "WEBCAM_RES";

/// Environment variable overriding the capture directory
pub const ENV_OUTPUT_DIR: &str = "WEBCAM_OUTPUT_DIR";

/// Settings read from the process environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub device:     Option<String>,
    pub resolution: Option<String>,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device:     None,
            resolution: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Settings {
    /// Reads settings from the real process environment
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Reads settings through a custom environment provider
    ///
    /// This allows tests to inject variables without touching the process
    /// environment.
    pub fn from_env_with<F>(env_provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env_provider(key).filter(|v| !v.trim().is_empty());

        Self {
            device:     non_empty(ENV_DEVICE),
            resolution: non_empty(ENV_RESOLUTION),
            output_dir: non_empty(ENV_OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        }
    }
}
