//! Application bootstrap and dependency wiring.
//!
//! This module contains the composition root - the single place where the
//! supervisor, the player API client, the host power trigger and the router
//! are instantiated and wired together.

use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;

use crate::api::AppState;
use crate::context::ServerAddress;
use crate::lifecycle::CommandPowerOff;
use crate::player::HttpPlayerApi;
use crate::services::{PlayerSupervisor, ProcessSupervisor, ProxyRouter};
use crate::state::{Config, HostCommands};

/// Errors that can occur while wiring services.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The outbound HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Container for all bootstrapped services.
#[derive(Clone)]
pub struct BootstrappedServices {
    /// Supervisor for the backing player process.
    pub supervisor: Arc<ProcessSupervisor>,
    /// Per-request dispatch.
    pub router: Arc<ProxyRouter>,
    /// Address the bridge listens on.
    pub address: ServerAddress,
}

impl BootstrappedServices {
    /// Builds the state for the HTTP layer.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState::new(Arc::clone(&self.router))
    }

    /// Stops the player so it is not orphaned when the bridge exits.
    ///
    /// The supervisor is closed, so requests still in flight cannot
    /// relaunch the player afterwards.
    pub async fn shutdown(&self) {
        log::info!("[Bootstrap] Beginning graceful shutdown...");
        self.supervisor.close().await;
        log::info!("[Bootstrap] Shutdown complete");
    }
}

/// Creates the HTTP client for player control API calls.
///
/// No timeout: a slow player stalls only the request waiting on it. Proxy
/// settings are ignored since the player is always local.
pub(crate) fn create_http_client() -> Result<Client, BootstrapError> {
    Ok(Client::builder().no_proxy().build()?)
}

/// Bootstraps all services with their dependencies.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn bootstrap_services(
    config: &Config,
    commands: HostCommands,
) -> Result<BootstrappedServices, BootstrapError> {
    let address = config.server_address();
    let http_client = create_http_client()?;

    let supervisor = Arc::new(ProcessSupervisor::new(
        commands.launch_command,
        config.launch_settle_delay,
    ));
    let player = Arc::new(HttpPlayerApi::new(
        http_client,
        address.url_builder(config.control_port),
    ));
    let power = Arc::new(CommandPowerOff::new(commands.shutdown_command));

    log::info!(
        "[Bootstrap] Player control API at {}, listening on {}",
        player.base_url(),
        address.bind_addr()
    );

    let router = Arc::new(ProxyRouter::new(
        Arc::clone(&supervisor) as Arc<dyn PlayerSupervisor>,
        player,
        power,
    ));

    Ok(BootstrappedServices {
        supervisor,
        router,
        address,
    })
}
