//! Network configuration context for the bridge.
//!
//! This module provides [`ServerAddress`], the host/port the bridge itself is
//! bound to, and [`UrlBuilder`] for the player control API URLs derived
//! from it.

use crate::protocol_constants::LOOPBACK_HOST;

/// Address the bridge listens on, resolved once at startup.
///
/// A blank host means "all interfaces". It is valid for binding but cannot be
/// used as an outbound destination, so outbound calls go to `localhost`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    host: String,
    port: u16,
}

impl ServerAddress {
    /// Creates a `ServerAddress` from the configured bind host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into().trim().to_string(),
            port,
        }
    }

    /// Returns the configured host (may be blank).
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the bind port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the socket address string to bind the listener to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        if self.host.is_empty() {
            format!("0.0.0.0:{}", self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Returns the host to use for outbound calls to local services.
    #[must_use]
    pub fn outbound_host(&self) -> &str {
        if self.host.is_empty() {
            LOOPBACK_HOST
        } else {
            &self.host
        }
    }

    /// Returns a `UrlBuilder` for a local service on `port`.
    #[must_use]
    pub fn url_builder(&self, port: u16) -> UrlBuilder {
        UrlBuilder::new(self.outbound_host(), port)
    }
}

/// Builder for constructing player control API URLs.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    host: String,
    port: u16,
}

impl UrlBuilder {
    /// Creates a new `UrlBuilder` for the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the base URL (e.g., `http://localhost:9090`).
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Returns the URL for a request target made of path and query string.
    #[must_use]
    pub fn control_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url(), path_and_query)
    }
}
