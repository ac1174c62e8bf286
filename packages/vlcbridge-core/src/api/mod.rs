//! HTTP API layer.
//!
//! This module contains the single relay handler, the router construction
//! and server startup. All decisions live in [`ProxyRouter`].

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::context::ServerAddress;
use crate::services::ProxyRouter;

pub mod http;

/// Errors that can occur when starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the TCP listener.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server loop stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Shared application state for the API layer.
///
/// Thin wrapper around the router; there is no other cross-request state.
#[derive(Clone)]
pub struct AppState {
    /// Per-request dispatch.
    pub router: Arc<ProxyRouter>,
}

impl AppState {
    pub fn new(router: Arc<ProxyRouter>) -> Self {
        Self { router }
    }
}

/// Binds the listener for `address` (blank host binds all interfaces).
pub async fn bind_listener(address: &ServerAddress) -> Result<TcpListener, ServerError> {
    let addr = address.bind_addr();
    TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serves the relay on an already bound listener until the task is aborted.
pub async fn start_server(state: AppState, listener: TcpListener) -> Result<(), ServerError> {
    match listener.local_addr() {
        Ok(addr) => log::info!("[Server] Listening on http://{}", addr),
        Err(e) => log::debug!("[Server] Listening (address unavailable: {})", e),
    }

    let app = http::create_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
