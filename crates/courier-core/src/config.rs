use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CourierError, Result};

/// Top-level configuration for the Courier client.
///
/// Loaded from `~/.courier/config.toml` by default. Every section falls back
/// to its defaults when omitted from the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl CourierConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CourierConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CourierError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Connection settings for the agent backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend, without a trailing path.
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
            user_agent: concat!("courier/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Terminal rendering preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print the structured context panel after each operation.
    pub show_context: bool,
    /// Use ANSI styling for emphasized spans.
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_context: true,
            color: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = CourierConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert!(config.backend.request_timeout_secs.is_none());
        assert!(config.backend.user_agent.starts_with("courier/"));
        assert!(config.display.show_context);
        assert!(config.display.color);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[backend]
base_url = "http://10.0.0.5:9000"
request_timeout_secs = 45
user_agent = "courier-test"

[display]
show_context = false
color = false
"#;
        let file = create_temp_config(content);
        let config = CourierConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.backend.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.backend.request_timeout_secs, Some(45));
        assert_eq!(config.backend.user_agent, "courier-test");
        assert!(!config.display.show_context);
        assert!(!config.display.color);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[backend]
base_url = "https://agent.example.com"
"#;
        let file = create_temp_config(content);
        let config = CourierConfig::load(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "https://agent.example.com");
        // Remaining fields use defaults
        assert!(config.backend.request_timeout_secs.is_none());
        assert_eq!(config.general.log_level, "info");
        assert!(config.display.show_context);
    }

    #[test]
    fn test_config_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = CourierConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.backend.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("[backend\nbase_url = ");
        let result = CourierConfig::load(file.path());
        assert!(matches!(result, Err(CourierError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = CourierConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.backend.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = CourierConfig::default();
        config.backend.request_timeout_secs = Some(10);
        config.display.color = false;
        config.save(&path).unwrap();

        let reloaded = CourierConfig::load(&path).unwrap();
        assert_eq!(reloaded.backend.base_url, config.backend.base_url);
        assert_eq!(reloaded.backend.request_timeout_secs, Some(10));
        assert!(!reloaded.display.color);
    }
}
