//! Configuration module for media-searcher
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;
pub(crate) use settings::positive_duration;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "MEDIA_SEARCHER_SETTINGS_PATH";

/// Load settings from the first file found, or defaults, then merge the environment
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match find_settings_file(explicit) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };

    settings.merge_env();
    Ok(settings)
}

/// Path named by the caller or the environment; never probed
fn explicit_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(SETTINGS_PATH_VAR).map(PathBuf::from))
}

/// Default settings locations, highest priority first
fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("media-searcher/settings.yml"));
    }
    paths
}

/// An explicit path wins even if it does not exist, so a typo fails loudly
fn find_settings_file(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit_path(explicit).or_else(|| default_paths().into_iter().find(|p| p.exists()))
}
