//! Unified error type for the Cardroom server.

use cardroom_protocol::ProtocolError;
use cardroom_room::RoomError;
use cardroom_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapped variant lets `?` convert
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CardroomError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error. Only config validation surfaces here; request
    /// failures become replies instead.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The hub task has stopped, so no request can be served.
    #[error("hub is not running")]
    HubUnavailable,

    /// An environment variable held an unusable value.
    #[error("invalid config: {0}")]
    Config(String),
}
