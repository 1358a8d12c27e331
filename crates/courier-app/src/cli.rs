//! CLI argument definitions for the Courier client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.
//! For logging, `RUST_LOG` sits between the flag and the config file.

use clap::Parser;
use std::path::PathBuf;

/// Courier: chat with your email and calendar agent from the terminal.
#[derive(Parser, Debug, Default)]
#[command(name = "courier", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the agent backend.
    #[arg(short = 'b', long = "backend-url")]
    pub backend_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Do not print the context panel after each turn.
    #[arg(long = "no-context")]
    pub no_context: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > COURIER_CONFIG env var > ~/.courier/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("COURIER_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the backend base URL.
    ///
    /// Priority: --backend-url flag > COURIER_BACKEND_URL env var > config value.
    pub fn resolve_backend_url(&self, config_url: &str) -> String {
        self.resolve_backend_url_with(config_url, std::env::var("COURIER_BACKEND_URL").ok())
    }

    fn resolve_backend_url_with(&self, config_url: &str, env_url: Option<String>) -> String {
        if let Some(ref url) = self.backend_url {
            return url.clone();
        }
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            return url;
        }
        config_url.to_string()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".courier").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".courier").join("config.toml");
    }
    PathBuf::from("config.toml")
}
