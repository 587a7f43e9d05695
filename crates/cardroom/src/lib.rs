//! # Cardroom
//!
//! A multiplayer card-room server. Players open named tables (up to eight
//! seats) or code-addressed lobbies, are dealt five cards each from a
//! shuffled 40-card deck, and play one card at a time in seat order.
//!
//! All room state lives in a single hub task; connection tasks only
//! decode requests and write events. See [`hub`] for the ordering this
//! gives.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardroom::prelude::*;
//!
//! # async fn start() -> Result<(), CardroomError> {
//! let server = CardroomServer::builder()
//!     .config(ServerConfig::from_env()?)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod dispatch;
mod error;
mod handler;
pub mod hub;
mod lifecycle;
mod server;

pub use config::{DEFAULT_HOST, DEFAULT_HUB_CHANNEL_SIZE, DEFAULT_PORT, ServerConfig};
pub use dispatch::dispatch;
pub use error::CardroomError;
pub use hub::{HubHandle, HubSnapshot};
pub use lifecycle::{on_connect, on_disconnect};
pub use server::{CardroomServer, CardroomServerBuilder};

/// Everything needed to run a server or talk its protocol.
pub mod prelude {
    pub use cardroom_protocol::{
        Card, ClientEnvelope, ClientRequest, Codec, ConnectionId, JsonCodec, PlayerInfo,
        PotEntry, Recipient, ReplyOutcome, RoomId, RoomListEntry, RoomPhase, ServerEvent,
    };
    pub use cardroom_room::{RegistryConfig, RoomConfig, RoomError, RoomRegistry};

    pub use crate::{CardroomError, CardroomServer, CardroomServerBuilder, ServerConfig};
}
