//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlcoach_core::Difficulty;

/// Application settings (`config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub practice: PracticeSettings,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Base URL of the REST API, including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// How long a toast stays visible
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Rows a code block may take before it scrolls
    #[serde(default = "default_code_max_height")]
    pub code_max_height: u16,

    /// Show message times in the chat panel
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

impl UiSettings {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_duration_ms(),
            code_max_height: default_code_max_height(),
            show_timestamps: true,
        }
    }
}

/// Practice flow settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PracticeSettings {
    /// Difficulty of the first question in a module
    #[serde(default)]
    pub start_difficulty: Difficulty,

    /// Normalised score at or above which the next question is harder
    #[serde(default = "default_advance_threshold")]
    pub advance_threshold: f64,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            start_difficulty: Difficulty::Easy,
            advance_threshold: default_advance_threshold(),
        }
    }
}

fn default_base_url() -> String {
    sqlcoach_client::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_toast_duration_ms() -> u64 {
    3000
}

fn default_code_max_height() -> u16 {
    12
}

fn default_advance_threshold() -> f64 {
    0.8
}

fn default_true() -> bool {
    true
}
