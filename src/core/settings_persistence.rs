//! Settings persistence
//!
//! Loads and saves [`ClientSettings`] as JSON.
//!
//! # File Location
//!
//! By default settings live in `settings.json` in the user's configuration
//! directory (e.g. `~/.config/xfchess-remote/settings.json` on Linux). If no
//! such directory can be determined, `settings.json` in the working directory
//! is used instead.
//!
//! # Error Handling
//!
//! [`load_or_default`] never fails: a missing or malformed file falls back to
//! defaults with a warning. [`load_settings`] and [`save_settings`] report
//! errors for callers that want to act on them.

use crate::core::error::CoreResult;
use crate::core::resources::ClientSettings;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Resolve the default settings file path
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "xfchess-remote") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Read settings from `path`
pub fn load_settings(path: &Path) -> CoreResult<ClientSettings> {
    let contents = fs::read_to_string(path)?;
    let settings: ClientSettings = serde_json::from_str(&contents)?;
    Ok(settings)
}

/// Read settings from `path`, falling back to defaults
pub fn load_or_default(path: &Path) -> ClientSettings {
    if !path.exists() {
        info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
        return ClientSettings::default();
    }

    match load_settings(path) {
        Ok(settings) => {
            info!("[SETTINGS] Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                path, e
            );
            ClientSettings::default()
        }
    }
}

/// Write settings to `path` as pretty JSON, creating parent directories
pub fn save_settings(path: &Path, settings: &ClientSettings) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}
