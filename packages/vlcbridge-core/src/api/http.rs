//! HTTP route handlers.
//!
//! Every GET, whatever its path, goes through [`relay`]. The handler is thin:
//! it builds an [`IncomingRequest`], asks [`ProxyRouter`] what to do and
//! renders the outcome.
//!
//! Rendering rules:
//! - A forwarded `200 OK` copies the player's headers, except
//!   `Content-Length` which is recomputed for the (possibly patched) body.
//! - Any other forwarded status is sent as a bare status line: no headers,
//!   no body.
//! - Requests that get no response are closed with an empty `204`.
//! - Failures become `404 Not Found` via [`FailedRequest`].
//! - `HEAD` is refused with `501 Not Implemented` before dispatch.
//!
//! [`ProxyRouter`]: crate::services::ProxyRouter

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::error::FailedRequest;
use crate::player::PlayerResponse;
use crate::request::IncomingRequest;
use crate::services::RelayOutcome;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Creates the Axum router. Every path is relayed.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(relay))
        .route("/{*path}", get(relay))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Relays one request to the player, or handles the shutdown command.
///
/// The GET route also matches `HEAD`, which must not launch or stop anything.
async fn relay(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if method != Method::GET {
        log::debug!("[Relay] Unsupported method {} for {}", method, uri);
        return StatusCode::NOT_IMPLEMENTED.into_response();
    }

    let request = IncomingRequest::from_uri(&uri);

    match state.router.dispatch(&headers, &request).await {
        Ok(RelayOutcome::Forwarded(response)) => player_response(response),
        Ok(RelayOutcome::NoResponse) => no_response(),
        Err(e) => FailedRequest::new(request.target, e).into_response(),
    }
}

/// Renders a forwarded player response.
fn player_response(response: PlayerResponse) -> Response {
    if response.status != StatusCode::OK {
        return response.status.into_response();
    }

    let body_len = response.body.len();
    let mut out = Response::new(Body::from(response.body));

    let headers = out.headers_mut();
    for (name, value) in &response.headers {
        if is_framing_header(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body_len));

    out
}

/// Headers that describe the player's connection rather than the document.
///
/// The body has already been read in full, so the player's framing does not
/// apply to the relayed response.
fn is_framing_header(name: &header::HeaderName) -> bool {
    name == header::CONTENT_LENGTH
        || name == header::TRANSFER_ENCODING
        || name == header::CONNECTION
}

/// Empty reply that closes the connection.
fn no_response() -> Response {
    (
        StatusCode::NO_CONTENT,
        [(header::CONNECTION, HeaderValue::from_static("close"))],
    )
        .into_response()
}
