//! Launch settings discovery.

use anyhow::{Context, Result};
use racer_training::LaunchSettings;
use std::path::{Path, PathBuf};

/// Settings file picked up from the working directory when `--config` is absent.
pub const LOCAL_SETTINGS_FILE: &str = "racer.toml";

/// Load launch settings.
///
/// Precedence:
/// 1. Environment variables
/// 2. `--config` file, or `./racer.toml` when present
/// 3. Defaults
pub fn load_settings(explicit: Option<&Path>) -> Result<LaunchSettings> {
    let file = explicit.map(Path::to_path_buf).or_else(local_settings_file);
    let settings = LaunchSettings::load(file.as_deref()).with_context(|| match &file {
        Some(path) => format!("Failed to load launch settings from {}", path.display()),
        None => "Failed to load launch settings".to_string(),
    })?;
    tracing::debug!(settings = ?settings, "Loaded launch settings");
    Ok(settings)
}

fn local_settings_file() -> Option<PathBuf> {
    let path = PathBuf::from(LOCAL_SETTINGS_FILE);
    path.exists().then_some(path)
}
