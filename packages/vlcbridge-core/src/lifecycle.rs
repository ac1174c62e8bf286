//! Host lifecycle abstraction.
//!
//! This module provides a [`HostPower`] trait for the one host-level action
//! the bridge performs: powering off (or logging out of) the machine when a
//! remote control sends the shutdown command. The command itself is resolved
//! per platform at startup; the core only fires it.

use std::process::Stdio;

use crate::player::CommandLine;

/// Trait for host power operations.
///
/// Request handlers use this trait rather than spawning platform commands
/// directly, so shutdown handling can be tested without powering anything off.
pub trait HostPower: Send + Sync {
    /// Starts powering off the host.
    ///
    /// Fire-and-forget: success or failure of the underlying mechanism is
    /// not reported back to the caller.
    fn request_power_off(&self);
}

/// Powers off the host by spawning a platform command as a detached process.
pub struct CommandPowerOff {
    command: CommandLine,
}

impl CommandPowerOff {
    /// Creates a power-off trigger for `command`.
    #[must_use]
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }

    /// Returns the command that will be spawned.
    #[must_use]
    pub fn command(&self) -> &CommandLine {
        &self.command
    }
}

impl HostPower for CommandPowerOff {
    fn request_power_off(&self) {
        log::info!("[Shutdown] Spawning host shutdown: {}", self.command);

        let mut cmd = self.command.to_command();
        cmd.stdin(Stdio::null()).kill_on_drop(false);

        // The child handle is dropped immediately; tokio reaps it on exit.
        if let Err(e) = cmd.spawn() {
            log::warn!("[Shutdown] Failed to spawn `{}`: {}", self.command, e);
        }
    }
}

/// No-op host power for testing or embedded use.
///
/// Logs the request and does nothing else.
pub struct NoopHostPower;

impl HostPower for NoopHostPower {
    fn request_power_off(&self) {
        log::debug!("[Shutdown] Power off requested (no-op)");
    }
}
