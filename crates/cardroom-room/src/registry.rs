//! Room registry: creates, tracks, and destroys rooms, and knows which
//! room each connection sits in.

use std::collections::HashMap;

use cardroom_protocol::{Card, ConnectionId, RoomId, RoomListEntry, RoomPhase};
use rand::Rng;

use crate::room::{Departure, Outbound, PlayOutcome, Player, Room};
use crate::{RegistryConfig, RoomConfig, RoomError, deck};

/// Length of a generated lobby code.
pub const ROOM_CODE_LEN: usize = 6;

const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a lobby code: six characters from `A-Z0-9`.
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> RoomId {
    let code: String = (0..ROOM_CODE_LEN)
        .map(|_| char::from(ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())]))
        .collect();
    RoomId::from(code)
}

/// Owns every room and the connection → room index.
///
/// This is the only place rooms are constructed or destroyed. A room is
/// removed the moment its last player leaves, so no room with zero
/// players is ever observable from outside.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Active rooms, keyed by room ID.
    rooms: HashMap<RoomId, Room>,

    /// Maps each connection to the room it is seated in.
    /// A connection is in at most ONE room at a time.
    seats: HashMap<ConnectionId, RoomId>,

    config: RegistryConfig,
}

impl RoomRegistry {
    /// Creates an empty registry after checking `config` is playable.
    pub fn new(config: RegistryConfig) -> Result<Self, RoomError> {
        config.validate()?;
        Ok(Self {
            rooms: HashMap::new(),
            seats: HashMap::new(),
            config,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // -- Creation -----------------------------------------------------------

    /// Opens a table under a caller-chosen id with the creator in seat 0.
    pub fn create_table(
        &mut self,
        room_id: RoomId,
        connection_id: ConnectionId,
        player_name: impl Into<String>,
    ) -> Result<Vec<Outbound>, RoomError> {
        self.ensure_unseated(connection_id)?;
        if self.rooms.contains_key(&room_id) {
            return Err(RoomError::DuplicateId(room_id));
        }
        let config = self.config.table.clone();
        Ok(self.insert_room(room_id, config, Player::new(connection_id, player_name)))
    }

    /// Opens a lobby under a fresh code with the creator in seat 0.
    ///
    /// Codes are redrawn until one is free, so an existing lobby is never
    /// replaced.
    pub fn create_lobby(
        &mut self,
        connection_id: ConnectionId,
        player_name: impl Into<String>,
    ) -> Result<(RoomId, Vec<Outbound>), RoomError> {
        self.create_lobby_with(connection_id, player_name, &mut rand::rng())
    }

    /// Like [`create_lobby`](Self::create_lobby), drawing the code from
    /// `rng`.
    pub fn create_lobby_with<R: Rng + ?Sized>(
        &mut self,
        connection_id: ConnectionId,
        player_name: impl Into<String>,
        rng: &mut R,
    ) -> Result<(RoomId, Vec<Outbound>), RoomError> {
        self.ensure_unseated(connection_id)?;
        let room_id = loop {
            let code = generate_room_code(rng);
            if !self.rooms.contains_key(&code) {
                break code;
            }
            tracing::debug!(room_id = %code, "lobby code collision, redrawing");
        };
        let config = self.config.lobby.clone();
        let outbound = self.insert_room(
            room_id.clone(),
            config,
            Player::new(connection_id, player_name),
        );
        Ok((room_id, outbound))
    }

    fn insert_room(&mut self, room_id: RoomId, config: RoomConfig, founder: Player) -> Vec<Outbound> {
        let connection_id = founder.connection_id();
        let room = Room::new(room_id.clone(), config, founder);
        let announce = room.players_updated();
        self.rooms.insert(room_id.clone(), room);
        self.seats.insert(connection_id, room_id.clone());
        tracing::info!(%room_id, %connection_id, "room created");
        vec![announce]
    }

    fn ensure_unseated(&self, connection_id: ConnectionId) -> Result<(), RoomError> {
        match self.seats.get(&connection_id) {
            Some(current) => Err(RoomError::AlreadySeated(connection_id, current.clone())),
            None => Ok(()),
        }
    }

    // -- Lookup and membership ----------------------------------------------

    /// Returns the room with `room_id`.
    pub fn get(&self, room_id: &RoomId) -> Result<&Room, RoomError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Seats `connection_id` in an existing room.
    ///
    /// Enforces the "one room at a time" invariant.
    pub fn join(
        &mut self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        player_name: impl Into<String>,
    ) -> Result<Vec<Outbound>, RoomError> {
        self.ensure_unseated(connection_id)?;
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        let outbound = room.join(Player::new(connection_id, player_name))?;
        self.seats.insert(connection_id, room_id.clone());
        Ok(outbound)
    }

    /// Stands `connection_id` up from whatever room it sits in, destroying
    /// the room if that was its last player.
    pub fn leave(&mut self, connection_id: ConnectionId) -> Result<Departure, RoomError> {
        let room_id = self
            .seats
            .get(&connection_id)
            .cloned()
            .ok_or(RoomError::NotSeated(connection_id))?;
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let mut departure = room.leave(connection_id)?;
        self.seats.remove(&connection_id);

        if room.is_empty() {
            self.remove(&room_id);
            departure.room_removed = true;
        }
        Ok(departure)
    }

    /// Destroys a room and unseats everyone in it. No-op if absent.
    pub fn remove(&mut self, room_id: &RoomId) -> bool {
        let Some(room) = self.rooms.remove(room_id) else {
            return false;
        };
        for connection_id in room.members() {
            self.seats.remove(&connection_id);
        }
        tracing::info!(%room_id, "room destroyed");
        true
    }

    /// Removes `connection_id` from the one room it may be seated in.
    ///
    /// Returns `None` if it was not seated anywhere. Used on disconnect,
    /// where "not seated" is the normal case rather than an error.
    pub fn remove_player_everywhere(&mut self, connection_id: ConnectionId) -> Option<Departure> {
        if !self.seats.contains_key(&connection_id) {
            return None;
        }
        match self.leave(connection_id) {
            Ok(departure) => Some(departure),
            Err(e) => {
                tracing::warn!(%connection_id, error = %e, "stale seat index entry");
                self.seats.remove(&connection_id);
                None
            }
        }
    }

    // -- Turn engine ----------------------------------------------------------

    /// Shuffles a fresh deck and deals it in `room_id`.
    pub fn start_game(&mut self, room_id: &RoomId) -> Result<Vec<Outbound>, RoomError> {
        self.start_game_with(room_id, &mut rand::rng())
    }

    /// Like [`start_game`](Self::start_game), shuffling with `rng`.
    pub fn start_game_with<R: Rng + ?Sized>(
        &mut self,
        room_id: &RoomId,
        rng: &mut R,
    ) -> Result<Vec<Outbound>, RoomError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        let deck = deck::shuffle_with(room.config().deck_size, rng);
        room.start_game(deck)
    }

    /// Plays `card` for `connection_id` in `room_id`.
    ///
    /// A missing room is the only error. Out-of-turn plays and unheld
    /// cards come back as a non-accepted [`PlayOutcome`] with no events.
    pub fn play_card(
        &mut self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        card: Card,
    ) -> Result<(PlayOutcome, Vec<Outbound>), RoomError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        Ok(room.play_card(connection_id, card))
    }

    /// Broadcasts a chat line from `connection_id` to `room_id`.
    pub fn chat(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        message: String,
    ) -> Result<Vec<Outbound>, RoomError> {
        self.get(room_id)?.chat(connection_id, message)
    }

    // -- Queries --------------------------------------------------------------

    /// Connections seated in `room_id`, in seat order. Empty if the room
    /// is gone.
    pub fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|room| room.members().collect())
            .unwrap_or_default()
    }

    /// The room `connection_id` is seated in, if any.
    pub fn seat_of(&self, connection_id: ConnectionId) -> Option<&RoomId> {
        self.seats.get(&connection_id)
    }

    /// Rooms that can currently be joined, sorted by id.
    pub fn list_rooms(&self) -> Vec<RoomListEntry> {
        let mut rooms: Vec<RoomListEntry> = self
            .rooms
            .values()
            .filter(|room| room.phase() == RoomPhase::Open)
            .map(Room::summary)
            .collect();
        rooms.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        rooms
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all active room IDs.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    #[test]
    fn test_room_code_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
            assert!(
                code.as_str()
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            );
        }
    }

    #[test]
    fn test_lobby_code_collision_is_redrawn() {
        let mut registry = RoomRegistry::default();
        let (first, _) = registry
            .create_lobby_with(conn(1), "Alice", &mut StdRng::seed_from_u64(9))
            .unwrap();
        // Same seed would draw the same first code.
        let (second, _) = registry
            .create_lobby_with(conn(2), "Bob", &mut StdRng::seed_from_u64(9))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(registry.room_count(), 2);
        assert_eq!(registry.members(&first), vec![conn(1)]);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = RegistryConfig::default();
        config.table.hand_size = 0;
        assert!(RoomRegistry::new(config).is_err());
    }

    #[test]
    fn test_create_indexes_founder() {
        let mut registry = RoomRegistry::default();
        registry.create_table(RoomId::from("T1"), conn(1), "Alice").unwrap();
        assert_eq!(registry.seat_of(conn(1)), Some(&RoomId::from("T1")));
    }

    #[test]
    fn test_remove_is_idempotent_and_unseats() {
        let mut registry = RoomRegistry::default();
        let id = RoomId::from("T1");
        registry.create_table(id.clone(), conn(1), "Alice").unwrap();
        registry.join(&id, conn(2), "Bob").unwrap();

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert_eq!(registry.seat_of(conn(1)), None);
        assert_eq!(registry.seat_of(conn(2)), None);
    }

    #[test]
    fn test_leave_when_not_seated() {
        let mut registry = RoomRegistry::default();
        assert!(matches!(
            registry.leave(conn(1)),
            Err(RoomError::NotSeated(_))
        ));
    }

    #[test]
    fn test_list_rooms_hides_playing_rooms() {
        let mut registry = RoomRegistry::default();
        registry.create_table(RoomId::from("B"), conn(1), "Alice").unwrap();
        registry.create_table(RoomId::from("A"), conn(2), "Bob").unwrap();
        registry.create_table(RoomId::from("C"), conn(3), "Carol").unwrap();
        registry.start_game(&RoomId::from("C")).unwrap();

        let ids: Vec<RoomId> = registry.list_rooms().into_iter().map(|r| r.room_id).collect();
        assert_eq!(ids, vec![RoomId::from("A"), RoomId::from("B")]);
    }

    #[test]
    fn test_play_in_missing_room() {
        let mut registry = RoomRegistry::default();
        assert!(matches!(
            registry.play_card(&RoomId::from("nowhere"), conn(1), Card(1)),
            Err(RoomError::NotFound(_))
        ));
    }
}
