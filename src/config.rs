//! Application configuration.
//!
//! Loads settings from config.json at startup. Provides the proxy endpoint,
//! content location, font and the counting-round style.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// How the round-5 counting puzzle is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CountStyle {
    /// Hangul syllables scattered over a jittered grid
    #[default]
    Glyphs,
    /// Non-overlapping filled circles
    Dots,
    /// Centered rows of "●" characters
    DotRows,
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the ranking proxy (e.g. "http://localhost:4000")
    pub api_base_url: String,
    /// Timeout for each proxy request
    pub request_timeout_secs: u64,
    /// Directory holding the bundle JSON files; defaults to `<exe_dir>/content`
    pub content_dir: Option<PathBuf>,
    /// Local key/value state file; defaults to the user data directory
    pub state_file: Option<PathBuf>,
    /// Font family used for puzzle rendering (must cover Hangul)
    pub font_family: String,
    /// Style of the round-5 counting puzzle
    pub count_style: CountStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000".to_string(),
            request_timeout_secs: 10,
            content_dir: None,
            state_file: None,
            font_family: "sans-serif".to_string(),
            count_style: CountStyle::Glyphs,
        }
    }
}

impl AppConfig {
    /// Content directory, resolved against the executable directory.
    pub fn content_dir(&self) -> PathBuf {
        self.content_dir
            .clone()
            .unwrap_or_else(crate::paths::get_default_content_dir)
    }

    /// Local state file, resolved against the user data directory.
    pub fn state_file(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(crate::paths::get_default_state_file)
    }
}

/// Loads configuration from the given path or returns defaults.
pub fn load_config_from(config_path: &Path) -> AppConfig {
    crate::log(&format!("Looking for config at: {}", config_path.display()));

    if config_path.exists() {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        crate::log("config.json not found. Using default config.");
    }

    AppConfig::default()
}

/// Loads config.json from the same directory as the executable.
fn load_config() -> AppConfig {
    load_config_from(&crate::paths::get_exe_dir().join("config.json"))
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns a reference to the global configuration.
///
/// Falls back to loading on first access if `init_config()` was not called.
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(load_config)
}
