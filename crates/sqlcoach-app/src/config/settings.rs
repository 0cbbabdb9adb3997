//! Settings file loading and creation

use std::path::{Path, PathBuf};

use sqlcoach_core::prelude::*;

use super::types::Settings;

/// Directory name under the platform config/data dirs
pub const APP_DIR: &str = "sqlcoach";

/// Settings file name
pub const CONFIG_FILENAME: &str = "config.toml";

/// Platform config directory for the app, e.g. `~/.config/sqlcoach`
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Platform data directory for the app, e.g. `~/.local/share/sqlcoach`
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR))
}

/// Load settings from `config_dir/config.toml`
///
/// A missing or unreadable file yields defaults; the problem is logged.
pub fn load_settings(config_dir: &Path) -> Settings {
    let config_path = config_dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Write a commented default `config.toml` unless one already exists
///
/// Returns the path of the settings file.
pub fn init_config_dir(config_dir: &Path) -> Result<PathBuf> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).map_err(|e| {
            Error::config(format!("Failed to create {}: {}", config_dir.display(), e))
        })?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        info!("Config file already exists at {:?}", config_path);
        return Ok(config_path);
    }

    let default_content = r#"# SQL Coach Configuration

[api]
base_url = "http://localhost:8000/api"
timeout_secs = 30

[ui]
toast_duration_ms = 3000
code_max_height = 12     # Rows before a code block scrolls
show_timestamps = true

[practice]
start_difficulty = "easy"
advance_threshold = 0.8  # Score (0.0-1.0) needed for a harder question
"#;

    std::fs::write(&config_path, default_content)
        .map_err(|e| Error::config(format!("Failed to write {}: {}", config_path.display(), e)))?;

    info!("Created default config at {:?}", config_path);
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlcoach_core::Difficulty;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "[api\nbase_url = ").unwrap();
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("nested").join(APP_DIR);

        let path = init_config_dir(&config_dir).unwrap();
        assert!(path.exists());

        let settings = load_settings(&config_dir);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.practice.start_difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[ui]\ncode_max_height = 20\n").unwrap();

        init_config_dir(dir.path()).unwrap();

        assert_eq!(load_settings(dir.path()).ui.code_max_height, 20);
    }
}
