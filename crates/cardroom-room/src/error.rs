//! Error types for the room layer.

use cardroom_protocol::{ConnectionId, RoomId, RoomPhase};

/// Errors that can occur during room operations.
///
/// Every variant is user-facing: it is reported to the requesting
/// connection only and no state has changed when it is returned. Plays
/// that break turn order or name an unheld card are not errors; see
/// [`PlayOutcome`](crate::PlayOutcome).
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A table with this name already exists.
    #[error("room {0} already exists")]
    DuplicateId(RoomId),

    /// The room has no free seat.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The connection already sits in a room. A connection occupies at
    /// most one room at a time.
    #[error("{0} is already seated in room {1}")]
    AlreadySeated(ConnectionId, RoomId),

    /// The connection is not seated in this room.
    #[error("{0} is not in room {1}")]
    NotInRoom(ConnectionId, RoomId),

    /// The connection is not seated in any room.
    #[error("{0} is not seated in any room")]
    NotSeated(ConnectionId),

    /// The operation is not allowed in the room's current phase, e.g.
    /// joining or starting a room that is already playing.
    #[error("room {0} is {1}")]
    InvalidPhase(RoomId, RoomPhase),

    /// Dealing to every seat would take more cards than the deck holds.
    #[error("room {room_id} needs {needed} cards but the deck has {available}")]
    DeckTooSmall {
        room_id: RoomId,
        needed: usize,
        available: usize,
    },

    /// A room or registry config is not playable.
    #[error("invalid room config: {0}")]
    InvalidConfig(String),
}

impl RoomError {
    /// HTTP-style status code used when this error is sent as a reply.
    pub fn code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::DuplicateId(_) | Self::RoomFull(_) | Self::AlreadySeated(..) => 409,
            Self::NotInRoom(..)
            | Self::NotSeated(_)
            | Self::InvalidPhase(..)
            | Self::DeckTooSmall { .. }
            | Self::InvalidConfig(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(RoomError::NotFound(RoomId::from("X")).code(), 404);
        assert_eq!(RoomError::RoomFull(RoomId::from("X")).code(), 409);
        assert_eq!(RoomError::DuplicateId(RoomId::from("X")).code(), 409);
        assert_eq!(
            RoomError::InvalidPhase(RoomId::from("X"), RoomPhase::Playing).code(),
            400
        );
    }

    #[test]
    fn test_display_names_the_room() {
        let err = RoomError::DeckTooSmall {
            room_id: RoomId::from("L0BBY9"),
            needed: 45,
            available: 40,
        };
        assert_eq!(
            err.to_string(),
            "room L0BBY9 needs 45 cards but the deck has 40"
        );
    }
}
