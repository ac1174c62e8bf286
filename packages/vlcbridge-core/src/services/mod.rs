//! Stateful services behind the HTTP layer.

pub mod proxy_router;
pub mod supervisor;

pub use proxy_router::{ProxyRouter, RelayOutcome};
pub use supervisor::{
    PlayerState, PlayerSupervisor, ProcessSupervisor, SupervisorError, SupervisorResult,
};
