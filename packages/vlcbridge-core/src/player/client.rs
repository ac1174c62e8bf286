//! Outbound client for the player's local HTTP control API.
//!
//! Requests are forwarded verbatim: the caller's path and query string are
//! appended to the control API base URL and issued as a plain GET. No
//! timeout is applied; a hung player stalls the forwarded request.

use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;

use crate::context::UrlBuilder;

/// Errors that can occur when calling the player control API.
#[derive(Debug, Error)]
pub enum PlayerApiError {
    /// Connection failed or the response could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenient Result alias for player control API calls.
pub type PlayerApiResult<T> = Result<T, PlayerApiError>;

/// A fully buffered response from the player control API.
#[derive(Debug, Clone)]
pub struct PlayerResponse {
    /// Status code as returned by the player.
    pub status: StatusCode,
    /// Response headers as returned by the player.
    pub headers: HeaderMap,
    /// Complete response body.
    pub body: Bytes,
}

/// Trait for fetching documents from the player control API.
///
/// Used by `ProxyRouter` so routing can be tested without a running player.
#[async_trait]
pub trait PlayerApi: Send + Sync {
    /// Issues a GET for `path_and_query` (e.g. `/requests/status.xml?command=pl_pause`).
    async fn get(&self, path_and_query: &str) -> PlayerApiResult<PlayerResponse>;
}

/// [`PlayerApi`] implementation backed by `reqwest`.
#[derive(Clone)]
pub struct HttpPlayerApi {
    client: Client,
    urls: UrlBuilder,
}

impl HttpPlayerApi {
    /// Creates a client for the control API reachable through `urls`.
    #[must_use]
    pub fn new(client: Client, urls: UrlBuilder) -> Self {
        Self { client, urls }
    }

    /// Returns the control API base URL (e.g. `http://localhost:9090`).
    #[must_use]
    pub fn base_url(&self) -> String {
        self.urls.base_url()
    }
}

#[async_trait]
impl PlayerApi for HttpPlayerApi {
    async fn get(&self, path_and_query: &str) -> PlayerApiResult<PlayerResponse> {
        let url = self.urls.control_url(path_and_query);
        log::debug!("[Player] GET {}", url);

        let res = self.client.get(&url).send().await?;
        let status = res.status();
        let headers = res.headers().clone();
        let body = res.bytes().await?;

        log::debug!(
            "[Player] {} -> {} ({} bytes)",
            path_and_query,
            status,
            body.len()
        );

        Ok(PlayerResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::create_http_client;
    use axum::routing::get;
    use axum::Router;

    async fn spawn_backend(router: Router) -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        port
    }

    #[tokio::test]
    async fn get_forwards_path_and_query() {
        let router = Router::new().route(
            "/requests/browse.xml",
            get(|uri: axum::http::Uri| async move { uri.query().unwrap_or("").to_string() }),
        );
        let port = spawn_backend(router).await;
        let urls = UrlBuilder::new("127.0.0.1", port);
        let api = HttpPlayerApi::new(create_http_client().unwrap(), urls);

        let res = api
            .get("/requests/browse.xml?dir=%2Fhome&dir=x")
            .await
            .unwrap();

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, Bytes::from_static(b"dir=%2Fhome&dir=x"));
    }

    #[tokio::test]
    async fn get_reports_connection_failure() {
        // Bind then drop to obtain a port with no listener.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let urls = UrlBuilder::new("127.0.0.1", port);
        let api = HttpPlayerApi::new(create_http_client().unwrap(), urls);
        let err = api.get("/requests/status.xml").await.unwrap_err();
        assert!(matches!(err, PlayerApiError::Http(_)));
    }
}
