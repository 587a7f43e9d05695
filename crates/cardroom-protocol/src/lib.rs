//! Wire protocol for Cardroom.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`ClientEnvelope`], [`ClientRequest`], [`ServerEvent`],
//!   [`Card`], [`RoomId`], ...): the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those structures are
//!   converted to and from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! The protocol layer knows nothing about rooms or turn order. It only
//! names the requests a client can make and the events a room can emit.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientEnvelope) → Hub → Room
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Card, ClientEnvelope, ClientRequest, PlayerInfo, PotEntry, Recipient, ReplyOutcome, RoomId,
    RoomListEntry, RoomPhase, ServerEvent,
};

/// Re-exported so crates above the protocol never name the transport
/// crate just to talk about a player's connection.
pub use cardroom_transport::ConnectionId;
