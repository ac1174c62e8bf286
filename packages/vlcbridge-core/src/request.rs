//! Inbound request classification.
//!
//! Pure functions that decide what the bridge does with a request before
//! any side effect happens: whether it carries an actionable command at all
//! (content type), what its query string says, and whether it is the
//! out-of-band shutdown command or a request for the player.

use std::collections::HashMap;

use axum::http::{header, HeaderMap, Uri};

use crate::protocol_constants::{
    COMMAND_MEDIA_TYPE, COMMAND_PARAM, KEY_COMMAND, SHUTDOWN_COMMAND, VALUE_PARAM,
};

// ─────────────────────────────────────────────────────────────────────────────
// Query String
// ─────────────────────────────────────────────────────────────────────────────

/// Query string parameters, each key mapped to all of its values in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    /// Parses a form-urlencoded query string.
    ///
    /// Blank values are kept. A missing or empty query yields an empty
    /// mapping. Returns `None` if any `&`-separated field is empty or has
    /// no `=`.
    #[must_use]
    pub fn parse(query: Option<&str>) -> Option<Self> {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        let query = query.unwrap_or_default();
        if query.is_empty() {
            return Some(Self { values });
        }

        if query.split('&').any(|field| !field.contains('=')) {
            return None;
        }

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            values
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Some(Self { values })
    }

    /// Returns every value recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Returns the value of `key` only if it was given exactly once.
    #[must_use]
    pub fn single(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some([value]) => Some(value.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content Type
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the declared media type, lower-cased and without parameters.
///
/// A request without a usable `Content-Type` is treated as plain text.
#[must_use]
pub fn media_type(headers: &HeaderMap) -> String {
    let declared = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase());

    match declared {
        Some(media) if media.split('/').count() == 2 => media,
        _ => COMMAND_MEDIA_TYPE.to_string(),
    }
}

/// Returns true if the request may carry an actionable command.
#[must_use]
pub fn accepts_commands(headers: &HeaderMap) -> bool {
    media_type(headers) == COMMAND_MEDIA_TYPE
}

// ─────────────────────────────────────────────────────────────────────────────
// Command Classification
// ─────────────────────────────────────────────────────────────────────────────

/// What the bridge does with an accepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCommand {
    /// Stop the player and power off the host.
    Shutdown,
    /// Forward the request to the player control API.
    PassThrough,
}

impl RelayCommand {
    /// Classifies a request by its query parameters.
    ///
    /// `command=shutdown` and `command=key&val=shutdown` are shutdown
    /// requests. A parameter given more than once never matches.
    #[must_use]
    pub fn classify(params: &QueryParams) -> Self {
        let command = params.single(COMMAND_PARAM);
        let value = params.single(VALUE_PARAM);

        let shutdown = matches!(command, Some(SHUTDOWN_COMMAND))
            || (command == Some(KEY_COMMAND) && value == Some(SHUTDOWN_COMMAND));

        if shutdown {
            Self::Shutdown
        } else {
            Self::PassThrough
        }
    }
}

/// An inbound request as seen by the router.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    /// Path without the query string.
    pub path: String,
    /// Path and query string exactly as the caller sent them.
    pub target: String,
    /// Parsed query string, `None` if it is malformed.
    pub params: Option<QueryParams>,
}

impl IncomingRequest {
    /// Builds an `IncomingRequest` from a request URI.
    #[must_use]
    pub fn from_uri(uri: &Uri) -> Self {
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_string();
        Self {
            path: uri.path().to_string(),
            target,
            params: QueryParams::parse(uri.query()),
        }
    }

}
