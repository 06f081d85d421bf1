//! Application configuration
//!
//! Loaded from `config.toml` in the platform config directory when present,
//! otherwise built from defaults. Every field has a default so a partial
//! file is fine.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_COPIED_ACK_MS, DEFAULT_HTTP_PORT};
use crate::error::{Error, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub ui: UiConfig,
    pub session: SessionConfig,
}

/// Web UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// HTTP port for pages, API and websocket
    pub http_port: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Per-session behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial camera video flag for new sessions
    pub video_enabled: bool,
    /// Initial microphone flag for new sessions
    pub audio_enabled: bool,
    /// Lifetime of the "copied" acknowledgement in milliseconds
    pub copied_ack_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            video_enabled: true,
            audio_enabled: true,
            copied_ack_ms: DEFAULT_COPIED_ACK_MS,
        }
    }
}

impl SessionConfig {
    pub fn copied_ack_ttl(&self) -> Duration {
        Duration::from_millis(self.copied_ack_ms)
    }
}

impl AppConfig {
    /// Load configuration from the platform config dir, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
            }
            _ => Ok(Self::default()),
        }
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mini-meet").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
