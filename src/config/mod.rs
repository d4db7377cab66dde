//! Configuration management
//!
//! This module handles loading and parsing configuration for the wiki.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preference storage configuration
    #[serde(default)]
    pub preferences: PreferencesConfig,
    /// Notification configuration
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Demo data configuration
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Preference storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Path of the JSON file holding persisted preferences
    #[serde(default = "default_preferences_path")]
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("data/preferences.json")
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a notification stays visible, in milliseconds
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

impl NotificationConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

fn default_dismiss_after_ms() -> u64 {
    3000
}

/// Demo data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Load the demo users and articles at startup
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

fn default_seed_enabled() -> bool {
    true
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - SCP_WIKI_PREFERENCES_PATH
    /// - SCP_WIKI_NOTIFICATIONS_DISMISS_AFTER_MS
    /// - SCP_WIKI_SEED_ENABLED
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("SCP_WIKI_PREFERENCES_PATH") {
            self.preferences.path = PathBuf::from(path);
        }

        if let Ok(ms) = std::env::var("SCP_WIKI_NOTIFICATIONS_DISMISS_AFTER_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                self.notifications.dismiss_after_ms = ms;
            }
        }

        if let Ok(enabled) = std::env::var("SCP_WIKI_SEED_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "true" | "1" | "yes" => self.seed.enabled = true,
                "false" | "0" | "no" => self.seed.enabled = false,
                _ => {} // Ignore invalid values
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENV_KEYS: &[&str] = &[
        "SCP_WIKI_PREFERENCES_PATH",
        "SCP_WIKI_NOTIFICATIONS_DISMISS_AFTER_MS",
        "SCP_WIKI_SEED_ENABLED",
    ];

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.preferences.path, PathBuf::from("data/preferences.json"));
        assert_eq!(config.notifications.dismiss_after_ms, 3000);
        assert_eq!(config.notifications.dismiss_after(), Duration::from_secs(3));
        assert!(config.seed.enabled);
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "   \n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.notifications.dismiss_after_ms, 3000);
        assert!(config.seed.enabled);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "notifications:\n  dismiss_after_ms: 500\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.notifications.dismiss_after_ms, 500);
        assert_eq!(config.preferences.path, PathBuf::from("data/preferences.json"));
        assert!(config.seed.enabled);
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
preferences:
  path: "/tmp/wiki/prefs.json"
notifications:
  dismiss_after_ms: 1500
seed:
  enabled: false
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.preferences.path, PathBuf::from("/tmp/wiki/prefs.json"));
        assert_eq!(config.notifications.dismiss_after_ms, 1500);
        assert!(!config.seed.enabled);
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "notifications:\n  dismiss_after_ms: soon\n").unwrap();

        let result = Config::load(file.path());

        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("parse"));
    }

    #[test]
    fn test_load_malformed_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "seed:\n  enabled: [invalid yaml").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "seed:\n  enabled: true\n").unwrap();

        std::env::set_var("SCP_WIKI_PREFERENCES_PATH", "/var/lib/wiki/prefs.json");
        std::env::set_var("SCP_WIKI_NOTIFICATIONS_DISMISS_AFTER_MS", "750");
        std::env::set_var("SCP_WIKI_SEED_ENABLED", "no");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.preferences.path, PathBuf::from("/var/lib/wiki/prefs.json"));
        assert_eq!(config.notifications.dismiss_after_ms, 750);
        assert!(!config.seed.enabled);

        clear_env();
    }

    #[test]
    fn test_env_override_invalid_values_ignored() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "notifications:\n  dismiss_after_ms: 1200\n").unwrap();

        std::env::set_var("SCP_WIKI_NOTIFICATIONS_DISMISS_AFTER_MS", "later");
        std::env::set_var("SCP_WIKI_SEED_ENABLED", "perhaps");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.notifications.dismiss_after_ms, 1200);
        assert!(config.seed.enabled);

        clear_env();
    }
}
