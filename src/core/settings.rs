//! Client settings and their persistence
//!
//! Settings live in `settings.json` under the user's configuration directory
//! (e.g. `~/.config/stockzero/settings.json` on Linux), falling back to the
//! working directory when no config directory can be resolved.
//!
//! # Error Handling
//!
//! [`ClientSettings::load_or_default`] never fails: a missing or unreadable
//! file falls back to defaults with a log line. The explicit
//! [`ClientSettings::load_from`] and [`ClientSettings::save_to`] return
//! [`CoreError`] for callers that want to know.

use crate::core::error::{CoreError, CoreResult};
use crate::networking::EngineMode;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// User preferences for talking to the move service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the StockZero web app, optionally with a path prefix
    pub server_url: String,
    /// Engine answering moves
    pub engine_mode: EngineMode,
    /// Seconds to wait for a verdict before rolling the move back
    pub request_timeout_secs: u64,
    /// Cookie holding the CSRF token
    pub csrf_cookie_name: String,
    /// Session cookie header forwarded with each request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            engine_mode: EngineMode::Default,
            request_timeout_secs: 30,
            csrf_cookie_name: "csrftoken".to_string(),
            cookie: None,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Where settings are read from and written to by default.
    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "stockzero", "StockZero") {
            proj_dirs.config_dir().join(SETTINGS_FILENAME)
        } else {
            PathBuf::from(SETTINGS_FILENAME)
        }
    }

    pub fn load_from(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| CoreError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| CoreError::SettingsFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or defaults if it is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => {
                info!("[SETTINGS] Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!(
                    "[SETTINGS] Failed to load settings at {:?}: {}. Using defaults.",
                    path, e
                );
                Self::default()
            }
        }
    }

    /// Write to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> CoreResult<()> {
        let write_err = |source| CoreError::SettingsWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            CoreError::SettingsFormat {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, json).map_err(write_err)?;
        info!("[SETTINGS] Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("stockzero-settings-{}-{}", std::process::id(), name))
            .join(SETTINGS_FILENAME)
    }

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.engine_mode, EngineMode::Default);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.csrf_cookie_name, "csrftoken");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: ClientSettings =
            serde_json::from_str(r#"{"engine_mode": "traditional"}"#).unwrap();
        assert_eq!(settings.engine_mode, EngineMode::Traditional);
        assert_eq!(settings.server_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("roundtrip");
        let settings = ClientSettings {
            server_url: "https://chess.example".to_string(),
            cookie: Some("csrftoken=abc".to_string()),
            ..ClientSettings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(ClientSettings::load_from(&path).unwrap(), settings);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = scratch_path("missing");
        assert_eq!(ClientSettings::load_or_default(&path), ClientSettings::default());
        match ClientSettings::load_from(&path) {
            Err(CoreError::SettingsRead { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_file() {
        let path = scratch_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ClientSettings::load_from(&path),
            Err(CoreError::SettingsFormat { .. })
        ));
        assert_eq!(ClientSettings::load_or_default(&path), ClientSettings::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
