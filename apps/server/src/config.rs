//! Server configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use vlcbridge_core::protocol_constants::{
    DEFAULT_BIND_PORT, DEFAULT_CONTROL_PORT, DEFAULT_LAUNCH_SETTLE_MS, DEFAULT_STREAMING_PORT,
};

/// Server configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind the HTTP server to. Blank binds all interfaces.
    /// Override: `VLCBRIDGE_BIND_HOST`
    pub bind_host: String,

    /// Port to bind the HTTP server to.
    /// Override: `VLCBRIDGE_BIND_PORT`
    pub bind_port: u16,

    /// Port of the player's local HTTP control API.
    /// Override: `VLCBRIDGE_CONTROL_PORT`
    pub control_port: u16,

    /// Port of the player's RTSP streaming listener (`null` disables it).
    pub streaming_port: Option<u16>,

    /// Player executable. Auto-detected per platform when not set.
    /// Override: `VLCBRIDGE_PLAYER`
    pub player_executable: Option<PathBuf>,

    /// Command that powers off the host. Auto-detected when not set.
    /// Override: `VLCBRIDGE_SHUTDOWN_COMMAND`
    pub shutdown_command: Option<String>,

    /// Pause after launching the player before forwarding (milliseconds).
    pub launch_settle_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: String::new(),
            bind_port: DEFAULT_BIND_PORT,
            control_port: DEFAULT_CONTROL_PORT,
            streaming_port: Some(DEFAULT_STREAMING_PORT),
            player_executable: None,
            shutdown_command: None,
            launch_settle_ms: DEFAULT_LAUNCH_SETTLE_MS,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to `null`, which means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("VLCBRIDGE_BIND_HOST") {
            self.bind_host = val;
        }

        if let Some(val) = var("VLCBRIDGE_BIND_PORT") {
            if let Ok(port) = val.parse() {
                self.bind_port = port;
            }
        }

        if let Some(val) = var("VLCBRIDGE_CONTROL_PORT") {
            if let Ok(port) = val.parse() {
                self.control_port = port;
            }
        }

        if let Some(val) = var("VLCBRIDGE_PLAYER") {
            if !val.trim().is_empty() {
                self.player_executable = Some(PathBuf::from(val));
            }
        }

        if let Some(val) = var("VLCBRIDGE_SHUTDOWN_COMMAND") {
            if !val.trim().is_empty() {
                self.shutdown_command = Some(val);
            }
        }

        // Note: VLCBRIDGE_LOG_LEVEL is handled by clap via #[arg(env = ...)] in main.rs
    }

    /// Converts to vlcbridge-core's Config type.
    pub fn to_core_config(&self) -> vlcbridge_core::Config {
        vlcbridge_core::Config {
            bind_host: self.bind_host.clone(),
            bind_port: self.bind_port,
            control_port: self.control_port,
            launch_settle_delay: Duration::from_millis(self.launch_settle_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ServerConfig::from_yaml("bind_port: 8181\nstreaming_port: null\n").unwrap();
        assert_eq!(config.bind_port, 8181);
        assert_eq!(config.control_port, 9090);
        assert_eq!(config.streaming_port, None);
        assert_eq!(config.launch_settle_ms, 1000);
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = ServerConfig::from_yaml("\n").unwrap();
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.streaming_port, Some(8554));
    }

    #[test]
    fn unknown_types_fail_to_parse() {
        assert!(ServerConfig::from_yaml("bind_port: eighty").is_err());
    }

    #[test]
    fn env_overrides_apply_and_ignore_garbage() {
        let env: HashMap<&str, &str> = [
            ("VLCBRIDGE_BIND_PORT", "not-a-port"),
            ("VLCBRIDGE_CONTROL_PORT", "9191"),
            ("VLCBRIDGE_SHUTDOWN_COMMAND", "systemctl poweroff"),
            ("VLCBRIDGE_PLAYER", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.control_port, 9191);
        assert_eq!(config.shutdown_command.as_deref(), Some("systemctl poweroff"));
        assert!(config.player_executable.is_none());
    }

    #[test]
    fn core_config_carries_settle_delay() {
        let config = ServerConfig {
            launch_settle_ms: 250,
            ..ServerConfig::default()
        };
        let core = config.to_core_config();
        assert_eq!(core.launch_settle_delay, Duration::from_millis(250));
        assert_eq!(core.server_address().outbound_host(), "localhost");
    }
}
