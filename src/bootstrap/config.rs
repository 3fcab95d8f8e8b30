//! Configuration resolution: explicit file, else `config.toml` in the data
//! directory, else built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::Result;
use cv_core::config::AppConfig;
use cv_infra::config::{load_config, CaptureSettings};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// File to read settings from, if any.
pub fn config_path(explicit: Option<&Path>, data_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidate = data_dir.join(DEFAULT_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

pub fn resolve_settings(explicit: Option<&Path>, data_dir: &Path) -> Result<CaptureSettings> {
    let config = match config_path(explicit, data_dir) {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            load_config(&path)?
        }
        None => {
            debug!("No configuration file, using defaults");
            AppConfig::empty()
        }
    };
    CaptureSettings::resolve(&config, data_dir)
}
