//! Player-facing pieces: command lines, the control API client and the
//! status document patch.

pub mod client;
pub mod command;
pub mod status;

pub use client::{HttpPlayerApi, PlayerApi, PlayerApiError, PlayerApiResult, PlayerResponse};
pub use command::CommandLine;
pub use status::{append_allow_shutdown, StatusDocumentError, StatusDocumentResult};
