//! Rooms, seating, and the turn engine for Cardroom.
//!
//! Everything here is synchronous and owns no I/O. Operations return the
//! events they produce as [`Outbound`] pairs; the server decides how to
//! deliver them.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates/destroys rooms, tracks who sits where
//! - [`Room`]: one table or lobby with its seats, hands, pot, and turn pointer
//! - [`PlayOutcome`]: why a play was or wasn't accepted
//! - [`RoomConfig`]: seat limit and deck shape (table and lobby presets)
//! - [`shuffle`]: uniform deck shuffle

mod config;
mod deck;
mod error;
mod registry;
mod room;
mod turn;

pub use config::{
    DEFAULT_DECK_SIZE, DEFAULT_HAND_SIZE, RegistryConfig, RoomConfig, TABLE_CAPACITY,
};
pub use deck::{shuffle, shuffle_with};
pub use error::RoomError;
pub use registry::{ROOM_CODE_LEN, RoomRegistry, generate_room_code};
pub use room::{Departure, Outbound, PlayOutcome, Player, Room};
