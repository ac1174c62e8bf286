//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by the player's control API and by the remote
//! control clients that talk to the bridge. Changing them breaks clients.

// ─────────────────────────────────────────────────────────────────────────────
// Player Control API
// ─────────────────────────────────────────────────────────────────────────────

/// Path of the player status document that gets patched before relay.
pub const STATUS_DOCUMENT_PATH: &str = "/requests/status.xml";

/// Element appended to the status document root to advertise shutdown support.
pub const ALLOW_SHUTDOWN_ELEMENT: &str = "allowshutdown";

/// Text content of the capability element.
pub const ALLOW_SHUTDOWN_VALUE: &str = "1";

/// Host used for outbound calls when the bridge is bound to all interfaces.
///
/// A blank bind address is valid for listening but not as a destination.
pub const LOOPBACK_HOST: &str = "localhost";

// ─────────────────────────────────────────────────────────────────────────────
// Remote Control Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameter naming the command.
pub const COMMAND_PARAM: &str = "command";

/// Query parameter carrying the command argument.
pub const VALUE_PARAM: &str = "val";

/// Standalone shutdown command (`command=shutdown`).
pub const SHUTDOWN_COMMAND: &str = "shutdown";

/// Key-press command (`command=key&val=shutdown`).
pub const KEY_COMMAND: &str = "key";

/// Media type that marks a request as carrying an actionable command.
///
/// Also the media type assumed when a request declares none.
pub const COMMAND_MEDIA_TYPE: &str = "text/plain";

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default port the bridge listens on.
pub const DEFAULT_BIND_PORT: u16 = 8080;

/// Default port of the player's local HTTP control API.
pub const DEFAULT_CONTROL_PORT: u16 = 9090;

/// Default port of the player's RTSP streaming listener.
pub const DEFAULT_STREAMING_PORT: u16 = 8554;

/// Pause after launching the player so its control API can start listening (ms).
pub const DEFAULT_LAUNCH_SETTLE_MS: u64 = 1000;
