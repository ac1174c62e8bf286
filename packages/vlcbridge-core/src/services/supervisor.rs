//! Player process supervision.
//!
//! [`ProcessSupervisor`] owns the single handle to the backing player process.
//! It launches the player on demand, detects exit lazily by polling the
//! handle, and asks the player to terminate on request.
//!
//! # State machine
//!
//! ```text
//! NoProcess / Exited --ensure_running--> Running   (launch + settle delay)
//! Running            --stop-----------> terminating, observed as Exited
//! Running            --external exit--> Exited     (seen on the next poll)
//! any                --close----------> closed, never launches again
//! ```
//!
//! There is no watchdog and no restart policy beyond the lazy relaunch on the
//! next `ensure_running` call.
//!
//! # Concurrency
//!
//! Requests are served concurrently, so the handle lives behind an async
//! mutex that is held across launch and settle delay. Callers racing on a
//! stopped player wait for the first launch instead of starting their own.

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Child;
use tokio::sync::Mutex;

use crate::player::CommandLine;

/// Errors that can occur while supervising the player process.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The player executable could not be started.
    #[error("Failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenient Result alias for supervisor operations.
pub type SupervisorResult<T> = Result<T, SupervisorError>;

/// Observed state of the supervised player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No process has been launched (or its handle was already released).
    NoProcess,
    /// A process handle exists and the process has not exited.
    Running,
    /// The tracked process was just observed to have exited.
    Exited,
}

/// Trait for player lifecycle operations.
///
/// Used by `ProxyRouter` so routing can be tested with a fake supervisor.
#[async_trait]
pub trait PlayerSupervisor: Send + Sync {
    /// Launches the player unless one is already alive.
    ///
    /// A successful return only means the process was started; whether its
    /// control API came up is discovered by the first forwarded request.
    async fn ensure_running(&self) -> SupervisorResult<()>;

    /// Asks a live player to terminate. Does not wait for it to exit.
    async fn stop(&self);

    /// Returns true if a player process exists and has not exited.
    async fn is_alive(&self) -> bool;
}

/// [`PlayerSupervisor`] that launches a real OS process.
pub struct ProcessSupervisor {
    launch_command: CommandLine,
    settle_delay: Duration,
    child: Mutex<Option<Child>>,
    launches: AtomicUsize,
    closed: AtomicBool,
}

impl ProcessSupervisor {
    /// Creates a supervisor that starts `launch_command` and then waits
    /// `settle_delay` for the player to begin listening.
    #[must_use]
    pub fn new(launch_command: CommandLine, settle_delay: Duration) -> Self {
        Self {
            launch_command,
            settle_delay,
            child: Mutex::new(None),
            launches: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns how many processes this supervisor has started.
    #[must_use]
    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    /// Polls the player and returns its current state.
    pub async fn state(&self) -> PlayerState {
        let mut child = self.child.lock().await;
        poll(&mut child)
    }

    /// Stops the player for good. Later `ensure_running` calls launch nothing.
    ///
    /// A launch already holding the handle finishes first and is then
    /// terminated by the `stop` that follows.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.stop().await;
    }

    fn launch(&self) -> SupervisorResult<Child> {
        let mut cmd = self.launch_command.to_command();
        cmd.stdin(Stdio::null()).kill_on_drop(false);

        let child = cmd.spawn().map_err(|source| SupervisorError::Launch {
            command: self.launch_command.to_string(),
            source,
        })?;

        self.launches.fetch_add(1, Ordering::SeqCst);
        log::info!(
            "[Supervisor] Launched player (pid {:?}): {}",
            child.id(),
            self.launch_command
        );
        Ok(child)
    }
}

#[async_trait]
impl PlayerSupervisor for ProcessSupervisor {
    async fn ensure_running(&self) -> SupervisorResult<()> {
        let mut child = self.child.lock().await;
        if poll(&mut child) == PlayerState::Running {
            return Ok(());
        }
        if self.closed.load(Ordering::SeqCst) {
            log::debug!("[Supervisor] Closed, not launching player");
            return Ok(());
        }

        *child = Some(self.launch()?);

        // Keep the lock so concurrent callers do not forward before the
        // control API had a chance to start listening.
        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }

    async fn stop(&self) {
        let mut guard = self.child.lock().await;
        if poll(&mut guard) != PlayerState::Running {
            log::debug!("[Supervisor] Stop requested but no player is running");
            return;
        }

        if let Some(child) = guard.as_mut() {
            log::info!("[Supervisor] Terminating player (pid {:?})", child.id());
            if let Err(e) = request_termination(child) {
                log::warn!("[Supervisor] Failed to terminate player: {}", e);
            }
        }
    }

    async fn is_alive(&self) -> bool {
        self.state().await == PlayerState::Running
    }
}

/// Non-blocking poll of the tracked process. Releases the handle once the
/// process is seen to have exited.
fn poll(child: &mut Option<Child>) -> PlayerState {
    let Some(process) = child.as_mut() else {
        return PlayerState::NoProcess;
    };

    match process.try_wait() {
        Ok(None) => PlayerState::Running,
        Ok(Some(status)) => {
            log::info!("[Supervisor] Player exited: {}", status);
            *child = None;
            PlayerState::Exited
        }
        Err(e) => {
            log::warn!("[Supervisor] Failed to poll player, dropping handle: {}", e);
            *child = None;
            PlayerState::Exited
        }
    }
}

/// Requests graceful termination (SIGTERM on Unix).
#[cfg(unix)]
fn request_termination(child: &mut Child) -> std::io::Result<()> {
    let Some(pid) = child.id() else {
        return Ok(());
    };
    // SAFETY: `pid` is our own child and has not been reaped (id() is Some).
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

/// Requests termination (TerminateProcess on Windows, there is no softer signal).
#[cfg(not(unix))]
fn request_termination(child: &mut Child) -> std::io::Result<()> {
    child.start_kill()
}
