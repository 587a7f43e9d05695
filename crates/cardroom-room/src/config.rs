//! Room configuration: seat limits and deck shape.

use serde::{Deserialize, Serialize};

use crate::RoomError;

/// Cards in a fresh deck, numbered `1..=40`.
pub const DEFAULT_DECK_SIZE: u16 = 40;

/// Cards dealt to each seated player when a game starts.
pub const DEFAULT_HAND_SIZE: usize = 5;

/// Seat limit for tables. A full table deals exactly the whole default
/// deck (8 × 5 = 40).
pub const TABLE_CAPACITY: usize = 8;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration for a room instance.
///
/// Tables and lobbies share the same room and turn engine; they differ
/// only in the config they are created with. See [`RoomConfig::table`] and
/// [`RoomConfig::lobby`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Maximum seated players. `None` means no limit.
    pub max_players: Option<usize>,

    /// Number of distinct cards in the deck.
    pub deck_size: u16,

    /// Cards dealt to each player on game start.
    pub hand_size: usize,
}

impl RoomConfig {
    /// Named tables: at most eight players, 40-card deck, 5-card hands.
    pub fn table() -> Self {
        Self {
            max_players: Some(TABLE_CAPACITY),
            deck_size: DEFAULT_DECK_SIZE,
            hand_size: DEFAULT_HAND_SIZE,
        }
    }

    /// Code-addressed lobbies: no seat limit.
    ///
    /// A lobby can therefore seat more players than the deck can serve;
    /// starting a game in that state is rejected with
    /// [`RoomError::DeckTooSmall`].
    pub fn lobby() -> Self {
        Self {
            max_players: None,
            ..Self::table()
        }
    }

    /// Cards a game with `players` seated would deal.
    pub fn cards_needed(&self, players: usize) -> usize {
        players.saturating_mul(self.hand_size)
    }

    /// Checks that the config describes a playable room.
    ///
    /// A capped room must be able to deal to every seat, so the cap and
    /// the deck size cannot drift apart silently.
    pub fn validate(&self) -> Result<(), RoomError> {
        if self.deck_size == 0 {
            return Err(RoomError::InvalidConfig("deck_size must be positive".into()));
        }
        if self.hand_size == 0 {
            return Err(RoomError::InvalidConfig("hand_size must be positive".into()));
        }
        match self.max_players {
            Some(0) => Err(RoomError::InvalidConfig(
                "max_players must be positive when set".into(),
            )),
            Some(max) if self.cards_needed(max) > usize::from(self.deck_size) => {
                Err(RoomError::InvalidConfig(format!(
                    "{max} seats need {} cards but the deck has {}",
                    self.cards_needed(max),
                    self.deck_size
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self::table()
    }
}

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// The two room presets a registry creates rooms from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Used by `create_table` (caller-supplied id).
    pub table: RoomConfig,
    /// Used by `create_lobby` (generated id).
    pub lobby: RoomConfig,
}

impl RegistryConfig {
    /// Validates both presets.
    pub fn validate(&self) -> Result<(), RoomError> {
        self.table.validate()?;
        self.lobby.validate()
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            table: RoomConfig::table(),
            lobby: RoomConfig::lobby(),
        }
    }
}
