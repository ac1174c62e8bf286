//! Per-request dispatch between the shutdown command and the player.
//!
//! [`ProxyRouter`] decides what happens to one inbound request:
//!
//! 1. Requests that do not declare plain text, or whose query string is
//!    malformed, carry no command and are dropped without a response.
//! 2. `command=shutdown` or `command=key&val=shutdown` stops the player and
//!    powers off the host. Nothing is forwarded.
//! 3. Everything else is forwarded verbatim to the player control API,
//!    launching the player first if needed. The status document is patched
//!    with the `allowshutdown` capability on the way back.
//!
//! The router only produces a [`RelayOutcome`]; turning it into an HTTP
//! response is the API layer's job.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::error::RelayResult;
use crate::lifecycle::HostPower;
use crate::player::{append_allow_shutdown, PlayerApi, PlayerResponse};
use crate::protocol_constants::STATUS_DOCUMENT_PATH;
use crate::request::{accepts_commands, IncomingRequest, RelayCommand};
use crate::services::PlayerSupervisor;

/// Result of dispatching one request.
#[derive(Debug)]
pub enum RelayOutcome {
    /// Nothing is written back to the caller.
    NoResponse,
    /// The player's response, patched if it is the status document.
    Forwarded(PlayerResponse),
}

/// Routes inbound requests to the shutdown path or the player.
pub struct ProxyRouter {
    supervisor: Arc<dyn PlayerSupervisor>,
    player: Arc<dyn PlayerApi>,
    power: Arc<dyn HostPower>,
}

impl ProxyRouter {
    pub fn new(
        supervisor: Arc<dyn PlayerSupervisor>,
        player: Arc<dyn PlayerApi>,
        power: Arc<dyn HostPower>,
    ) -> Self {
        Self {
            supervisor,
            player,
            power,
        }
    }

    /// Handles one request.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`](crate::error::RelayError) if the player cannot
    /// be launched, the control API call fails, or the status document is
    /// malformed.
    pub async fn dispatch(
        &self,
        headers: &HeaderMap,
        request: &IncomingRequest,
    ) -> RelayResult<RelayOutcome> {
        if !accepts_commands(headers) {
            log::debug!("[Relay] Ignoring {}: not a plain text request", request.target);
            return Ok(RelayOutcome::NoResponse);
        }

        let Some(params) = &request.params else {
            log::debug!("[Relay] Ignoring {}: malformed query string", request.target);
            return Ok(RelayOutcome::NoResponse);
        };

        if !params.is_empty() {
            log::debug!("[Relay] Received command: {:?} ({})", params, request.path);
        }

        match RelayCommand::classify(params) {
            RelayCommand::Shutdown => {
                self.shutdown_host().await;
                Ok(RelayOutcome::NoResponse)
            }
            RelayCommand::PassThrough => self.forward(request).await,
        }
    }

    async fn shutdown_host(&self) {
        log::info!("[Relay] Shutdown command received");
        self.supervisor.stop().await;
        self.power.request_power_off();
    }

    async fn forward(&self, request: &IncomingRequest) -> RelayResult<RelayOutcome> {
        self.supervisor.ensure_running().await?;

        if !self.supervisor.is_alive().await {
            log::warn!(
                "[Relay] Player is not running, dropping {}",
                request.target
            );
            return Ok(RelayOutcome::NoResponse);
        }

        let mut response = self.player.get(&request.target).await?;

        if request.path == STATUS_DOCUMENT_PATH {
            response.body = append_allow_shutdown(&response.body)?.into();
        }

        Ok(RelayOutcome::Forwarded(response))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fakes shared by router and API tests.

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use bytes::Bytes;
    use parking_lot::Mutex;

    use crate::lifecycle::HostPower;
    use crate::player::{PlayerApi, PlayerApiResult, PlayerResponse};
    use crate::services::{PlayerSupervisor, SupervisorResult};

    /// Supervisor that counts calls and reports a fixed liveness.
    pub struct FakeSupervisor {
        pub alive: AtomicBool,
        pub stay_dead: bool,
        pub ensure_calls: AtomicUsize,
        pub stop_calls: AtomicUsize,
        pub launches: AtomicUsize,
    }

    impl FakeSupervisor {
        pub fn new() -> Self {
            Self {
                alive: AtomicBool::new(false),
                stay_dead: false,
                ensure_calls: AtomicUsize::new(0),
                stop_calls: AtomicUsize::new(0),
                launches: AtomicUsize::new(0),
            }
        }

        /// A supervisor whose player never comes alive.
        pub fn dead() -> Self {
            Self {
                stay_dead: true,
                ..Self::new()
            }
        }

        pub fn total_calls(&self) -> usize {
            self.ensure_calls.load(Ordering::SeqCst) + self.stop_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlayerSupervisor for FakeSupervisor {
        async fn ensure_running(&self) -> SupervisorResult<()> {
            self.ensure_calls.fetch_add(1, Ordering::SeqCst);
            if !self.stay_dead && !self.alive.swap(true, Ordering::SeqCst) {
                self.launches.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }

        async fn stop(&self) {
            self.stop_calls.fetch_add(1, Ordering::SeqCst);
            self.alive.store(false, Ordering::SeqCst);
        }

        async fn is_alive(&self) -> bool {
            self.alive.load(Ordering::SeqCst)
        }
    }

    /// Player API that answers every request with a canned response.
    pub struct FakePlayerApi {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Bytes,
        pub requests: Mutex<Vec<String>>,
    }

    impl FakePlayerApi {
        pub fn new(status: StatusCode, body: &'static str) -> Self {
            let mut headers = HeaderMap::new();
            headers.insert("content-type", HeaderValue::from_static("text/xml"));
            headers.insert("content-length", HeaderValue::from(body.len()));
            headers.insert("x-player", HeaderValue::from_static("vlc"));
            Self {
                status,
                headers,
                body: Bytes::from_static(body.as_bytes()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().len()
        }
    }

    #[async_trait]
    impl PlayerApi for FakePlayerApi {
        async fn get(&self, path_and_query: &str) -> PlayerApiResult<PlayerResponse> {
            self.requests.lock().push(path_and_query.to_string());
            Ok(PlayerResponse {
                status: self.status,
                headers: self.headers.clone(),
                body: self.body.clone(),
            })
        }
    }

    /// Host power that counts power-off requests.
    #[derive(Default)]
    pub struct FakeHostPower {
        pub requests: AtomicUsize,
    }

    impl HostPower for FakeHostPower {
        fn request_power_off(&self) {
            self.requests.fetch_add(1, Ordering::SeqCst);
        }
    }
}
