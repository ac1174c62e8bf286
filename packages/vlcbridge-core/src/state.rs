//! Core configuration.
//!
//! [`Config`] holds the settings the core needs at runtime. [`HostCommands`]
//! carries the two platform-specific command lines resolved once at startup
//! by the embedding application.

use std::time::Duration;

use crate::context::ServerAddress;
use crate::player::CommandLine;
use crate::protocol_constants::{DEFAULT_BIND_PORT, DEFAULT_CONTROL_PORT, DEFAULT_LAUNCH_SETTLE_MS};

/// Runtime configuration for the bridge.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to. Blank means all interfaces.
    pub bind_host: String,
    /// Port to bind to.
    pub bind_port: u16,
    /// Port of the player's local HTTP control API.
    pub control_port: u16,
    /// Pause after launching the player before forwarding requests.
    pub launch_settle_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_host: String::new(),
            bind_port: DEFAULT_BIND_PORT,
            control_port: DEFAULT_CONTROL_PORT,
            launch_settle_delay: Duration::from_millis(DEFAULT_LAUNCH_SETTLE_MS),
        }
    }
}

impl Config {
    /// Returns the address the bridge listens on.
    #[must_use]
    pub fn server_address(&self) -> ServerAddress {
        ServerAddress::new(self.bind_host.clone(), self.bind_port)
    }
}

/// Platform command lines, resolved once at startup.
#[derive(Debug, Clone)]
pub struct HostCommands {
    /// Starts the player with its HTTP control API enabled on `control_port`.
    pub launch_command: CommandLine,
    /// Powers off or logs out the host.
    pub shutdown_command: CommandLine,
}
