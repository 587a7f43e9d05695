//! Core protocol types for Cardroom's wire format.
//!
//! Everything here is serialized to JSON and sent over a connection. The
//! JSON shapes are part of the client contract, so the serde attributes
//! matter as much as the Rust types.

use std::fmt;

use serde::{Deserialize, Serialize};

use cardroom_transport::ConnectionId;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The identifier of a room (a table or a lobby).
///
/// Tables use whatever name their creator picked; lobbies get a generated
/// six-character code. Either way it is just a string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps a string as a room identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A card: an opaque rank drawn from `1..=deck_size`.
///
/// Ranks have no suit and no ordering that the game cares about; two
/// cards are the same card exactly when their ranks are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(pub u16);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient: where an event goes
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// Room operations return `(Recipient, ServerEvent)` pairs and never touch
/// a connection themselves; the hub resolves the recipient at delivery
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    /// Every connection currently seated in the room.
    Room(RoomId),

    /// One connection only. Used for hands and for replies.
    Connection(ConnectionId),
}

// ---------------------------------------------------------------------------
// Shared payload pieces
// ---------------------------------------------------------------------------

/// Lifecycle phase of a room as shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RoomPhase {
    /// Accepting joins; no game running.
    #[default]
    Open,
    /// Cards are dealt and turns are being played.
    Playing,
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("Open"),
            Self::Playing => f.write_str("Playing"),
        }
    }
}

/// A seated player as announced to the rest of the room.
///
/// Deliberately has no `hand` field: membership lists are broadcast, and
/// hands must only ever reach their owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: ConnectionId,
    pub name: String,
}

/// One card in the pot and who played it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotEntry {
    pub name: String,
    pub card: Card,
}

/// A summary of a room returned in room listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListEntry {
    pub room_id: RoomId,
    pub player_count: usize,
    /// `None` for rooms without a seat limit (lobbies).
    pub max_players: Option<usize>,
    pub phase: RoomPhase,
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Everything a client can ask the server to do.
///
/// Internally tagged, so a join looks like
/// `{ "type": "JoinRoom", "room_id": "T1", "player_name": "Bob" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientRequest {
    /// Open a lobby under a freshly generated code and sit in it.
    CreateLobby { player_name: String },

    /// Open a table under a caller-chosen name and sit in it.
    CreateTable { room_id: RoomId, player_name: String },

    /// Sit in an existing table or lobby.
    JoinRoom { room_id: RoomId, player_name: String },

    /// Stand up from whatever room this connection is in.
    LeaveRoom,

    /// Chat to everyone in the room.
    SendMessage { room_id: RoomId, message: String },

    /// Shuffle, deal, and start taking turns.
    StartGame { room_id: RoomId },

    /// Play one card from the sender's hand.
    PlayCard { room_id: RoomId, card: Card },

    /// Ask for the rooms that can still be joined.
    ListRooms,
}

/// A request plus the id the client wants its reply tagged with.
///
/// Requests without a `request_id` are fire-and-forget: they still take
/// effect, but no `Reply` is sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEnvelope {
    #[serde(default)]
    pub request_id: Option<u64>,
    pub request: ClientRequest,
}

impl ClientEnvelope {
    /// An envelope that expects a reply tagged `request_id`.
    pub fn with_reply(request_id: u64, request: ClientRequest) -> Self {
        Self {
            request_id: Some(request_id),
            request,
        }
    }

    /// An envelope that expects no reply.
    pub fn fire_and_forget(request: ClientRequest) -> Self {
        Self {
            request_id: None,
            request,
        }
    }
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// The answer to a request that carried a `request_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ReplyOutcome {
    /// The request was applied. Creates and joins name the room.
    Ok { room_id: Option<RoomId> },

    /// The request was refused and nothing changed. `code` follows HTTP
    /// conventions (400 bad request, 404 not found, 409 conflict).
    Error { code: u16, message: String },
}

/// Everything the server can push to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Room membership changed; `players` is in seat order. While a game
    /// is running `turn` is the seat to play, which may have moved if a
    /// seat before it emptied.
    PlayersUpdated {
        room_id: RoomId,
        players: Vec<PlayerInfo>,
        turn: Option<usize>,
    },

    /// A chat line from a seated player.
    NewMessage {
        room_id: RoomId,
        from: String,
        message: String,
    },

    /// Cards were dealt. `turn` is the seat index that plays first.
    GameStarted {
        room_id: RoomId,
        players: Vec<String>,
        turn: usize,
    },

    /// The receiving player's own hand. Only ever sent to its owner.
    YourCards { room_id: RoomId, cards: Vec<Card> },

    /// A card went into the pot and the turn moved on.
    CardPlayed {
        room_id: RoomId,
        name: String,
        card: Card,
        pot: Vec<PotEntry>,
        turn: usize,
    },

    /// Rooms that can currently be joined.
    RoomList { rooms: Vec<RoomListEntry> },

    /// The answer to a request that asked for one.
    Reply {
        request_id: u64,
        outcome: ReplyOutcome,
    },

    /// Something the server could not even parse.
    Error { code: u16, message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomId::from("T1")).unwrap();
        assert_eq!(json, "\"T1\"");
    }

    #[test]
    fn test_room_id_display() {
        assert_eq!(RoomId::new("ABC123").to_string(), "ABC123");
    }

    #[test]
    fn test_card_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&Card(40)).unwrap(), "40");
        let card: Card = serde_json::from_str("7").unwrap();
        assert_eq!(card, Card(7));
    }

    #[test]
    fn test_client_request_join_json_format() {
        let req = ClientRequest::JoinRoom {
            room_id: RoomId::from("T1"),
            player_name: "Bob".into(),
        };
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["type"], "JoinRoom");
        assert_eq!(json["room_id"], "T1");
        assert_eq!(json["player_name"], "Bob");
    }

    #[test]
    fn test_client_request_play_card_parses_from_client_json() {
        let raw = r#"{ "type": "PlayCard", "room_id": "T1", "card": 12 }"#;
        let req: ClientRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(
            req,
            ClientRequest::PlayCard {
                room_id: RoomId::from("T1"),
                card: Card(12),
            }
        );
    }

    #[test]
    fn test_client_envelope_request_id_defaults_to_none() {
        let raw = r#"{ "request": { "type": "StartGame", "room_id": "T1" } }"#;
        let env: ClientEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(env.request_id, None);
        assert_eq!(
            env,
            ClientEnvelope::fire_and_forget(ClientRequest::StartGame {
                room_id: RoomId::from("T1"),
            })
        );
    }

    #[test]
    fn test_unknown_request_type_fails_to_parse() {
        let raw = r#"{ "type": "FoldEverything" }"#;
        let result: Result<ClientRequest, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn test_players_updated_has_no_hand_field() {
        let event = ServerEvent::PlayersUpdated {
            room_id: RoomId::from("T1"),
            players: vec![PlayerInfo {
                id: ConnectionId::new(4),
                name: "Alice".into(),
            }],
            turn: None,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "PlayersUpdated");
        assert!(json["turn"].is_null());
        assert_eq!(json["players"][0]["id"], 4);
        assert_eq!(json["players"][0]["name"], "Alice");
        assert_eq!(json["players"][0].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_card_played_json_format() {
        let event = ServerEvent::CardPlayed {
            room_id: RoomId::from("T1"),
            name: "Alice".into(),
            card: Card(9),
            pot: vec![PotEntry {
                name: "Alice".into(),
                card: Card(9),
            }],
            turn: 1,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "CardPlayed");
        assert_eq!(json["card"], 9);
        assert_eq!(json["pot"][0]["name"], "Alice");
        assert_eq!(json["turn"], 1);
    }

    #[test]
    fn test_reply_ok_json_format() {
        let event = ServerEvent::Reply {
            request_id: 5,
            outcome: ReplyOutcome::Ok {
                room_id: Some(RoomId::from("K7Q2ZD")),
            },
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "Reply");
        assert_eq!(json["request_id"], 5);
        assert_eq!(json["outcome"]["status"], "Ok");
        assert_eq!(json["outcome"]["room_id"], "K7Q2ZD");
    }

    #[test]
    fn test_reply_error_json_format() {
        let outcome = ReplyOutcome::Error {
            code: 404,
            message: "room T9 not found".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "Error");
        assert_eq!(json["code"], 404);
    }

    #[test]
    fn test_room_list_entry_without_capacity() {
        let entry = RoomListEntry {
            room_id: RoomId::from("LOBBY1"),
            player_count: 3,
            max_players: None,
            phase: RoomPhase::Open,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json["max_players"].is_null());
        assert_eq!(json["phase"], "Open");
    }
}
