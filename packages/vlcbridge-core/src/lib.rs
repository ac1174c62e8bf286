//! vlcbridge Core - player supervision and control API relay.
//!
//! This crate exposes a single HTTP endpoint in front of a media player's
//! local control API. It lazily starts and supervises the player process,
//! forwards remote control requests to it, advertises shutdown support in the
//! player's status document, and handles an out-of-band shutdown command that
//! stops the player and powers off the host.
//!
//! # Architecture
//!
//! - [`services`]: the player process supervisor and the per-request router
//! - [`player`]: command lines, the control API client and the status patch
//! - [`request`]: content type and query string classification
//! - [`api`]: the axum router and server startup
//! - [`bootstrap`]: the composition root
//! - [`error`]: centralized error types
//!
//! # Abstraction Traits
//!
//! The router depends on traits so it can be exercised without a player or a
//! host to power off:
//!
//! - [`PlayerSupervisor`](services::PlayerSupervisor): player lifecycle
//! - [`PlayerApi`](player::PlayerApi): control API calls
//! - [`HostPower`](lifecycle::HostPower): host power-off
//!
//! Platform discovery (which player binary, which shutdown command) is not
//! part of this crate; the embedding application supplies [`HostCommands`].

#![warn(clippy::all)]

pub mod api;
pub mod bootstrap;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod player;
pub mod protocol_constants;
pub mod request;
pub mod services;
pub mod state;

// Re-export commonly used types at the crate root
pub use context::{ServerAddress, UrlBuilder};
pub use error::{FailedRequest, RelayError, RelayResult};
pub use lifecycle::{CommandPowerOff, HostPower, NoopHostPower};
pub use player::{CommandLine, HttpPlayerApi, PlayerApi, PlayerResponse};
pub use request::{IncomingRequest, QueryParams, RelayCommand};
pub use services::{PlayerState, PlayerSupervisor, ProcessSupervisor, ProxyRouter, RelayOutcome};
pub use state::{Config, HostCommands};

// Re-export bootstrap types
pub use bootstrap::{bootstrap_services, BootstrapError, BootstrappedServices};

// Re-export API types
pub use api::{bind_listener, start_server, AppState, ServerError};
