//! Transport layer for Cardroom.
//!
//! Provides the [`Transport`] and [`Connection`] traits that the server
//! accepts players through, and the [`ConnectionId`] that identifies a
//! connected player everywhere above this layer.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a connection.
///
/// Assigned by the transport when a connection is accepted and never
/// reused for the lifetime of the process. Rooms key their seats by it,
/// so it travels on the wire as a plain number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener that hands out connected peers.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next peer and completes whatever handshake the
    /// transport needs before returning it.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// One connected peer, exchanging whole messages as byte buffers.
///
/// `send` and `recv` must be usable concurrently from different tasks:
/// the server reads requests on one task while room events are written
/// from another.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Writes one message.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads the next message, or `Ok(None)` once the peer has closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Starts a close handshake with the peer.
    async fn close(&self) -> Result<(), Self::Error>;

    /// The id assigned at accept time.
    fn id(&self) -> ConnectionId;
}
