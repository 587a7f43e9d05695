//! A room: seats in join order, dealt hands, the pot, and the turn pointer.
//!
//! Rooms are created and destroyed only by the
//! [`RoomRegistry`](crate::RoomRegistry); every mutating method here is
//! crate-private. Operations never talk to a connection. They return the
//! events they produce as `(Recipient, ServerEvent)` pairs and leave
//! delivery to the caller.

use cardroom_protocol::{
    Card, ConnectionId, PlayerInfo, PotEntry, Recipient, RoomId, RoomListEntry, RoomPhase,
    ServerEvent,
};

use crate::turn::{deal, next_turn, turn_after_leave};
use crate::{RoomConfig, RoomError};

/// An event paired with who should receive it.
pub type Outbound = (Recipient, ServerEvent);

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    connection_id: ConnectionId,
    display_name: String,
    hand: Vec<Card>,
}

impl Player {
    /// A player with an empty hand. Names are neither unique nor checked.
    pub fn new(connection_id: ConnectionId, display_name: impl Into<String>) -> Self {
        Self {
            connection_id,
            display_name: display_name.into(),
            hand: Vec::new(),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The cards this player holds, in dealt order.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// The public view of this player: no hand.
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.connection_id,
            name: self.display_name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What happened to a `play_card` request.
///
/// Only `Accepted` changes state. The other variants are silent on the
/// wire: the client simply never sees a `CardPlayed` or an ack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The card moved from the hand to the pot and the turn advanced.
    Accepted,
    /// No game is running in this room.
    NotPlaying,
    /// The connection has no seat in this room.
    NotSeated,
    /// It is another seat's turn.
    NotYourTurn,
    /// The card is not in the player's hand.
    CardNotHeld,
}

impl PlayOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// A player who stood up, and the room they left behind.
#[derive(Debug, Clone)]
pub struct Departure {
    /// The room the player left.
    pub room_id: RoomId,
    /// The seat index they held.
    pub seat: usize,
    /// The player, with whatever hand they still held.
    pub player: Player,
    /// Who is still seated, in seat order.
    pub remaining: Vec<PlayerInfo>,
    /// `true` if the room was empty afterwards and has been destroyed.
    pub room_removed: bool,
    /// Events produced by the departure.
    pub outbound: Vec<Outbound>,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// The authoritative state of one table or lobby.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    config: RoomConfig,
    players: Vec<Player>,
    phase: RoomPhase,
    /// Seat index to play. Meaningful only while `Playing`.
    turn: usize,
    pot: Vec<PotEntry>,
}

impl Room {
    /// A new open room with `founder` in seat 0.
    pub(crate) fn new(id: RoomId, config: RoomConfig, founder: Player) -> Self {
        Self {
            id,
            config,
            players: vec![founder],
            phase: RoomPhase::Open,
            turn: 0,
            pot: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// Seated players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The seat to play, or `None` when no game is running.
    pub fn turn_index(&self) -> Option<usize> {
        match self.phase {
            RoomPhase::Playing if !self.players.is_empty() => Some(self.turn),
            _ => None,
        }
    }

    /// Cards played so far this game, oldest first.
    pub fn pot(&self) -> &[PotEntry] {
        &self.pot
    }

    /// The seat index of `connection_id`, if seated here.
    pub fn seat_of(&self, connection_id: ConnectionId) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.connection_id == connection_id)
    }

    /// The hand held by `connection_id`, if seated here.
    pub fn hand(&self, connection_id: ConnectionId) -> Option<&[Card]> {
        self.seat_of(connection_id)
            .map(|seat| self.players[seat].hand())
    }

    /// Public membership list in seat order.
    pub fn player_infos(&self) -> Vec<PlayerInfo> {
        self.players.iter().map(Player::info).collect()
    }

    /// Connections seated here, in seat order.
    pub fn members(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.players.iter().map(Player::connection_id)
    }

    pub fn summary(&self) -> RoomListEntry {
        RoomListEntry {
            room_id: self.id.clone(),
            player_count: self.players.len(),
            max_players: self.config.max_players,
            phase: self.phase,
        }
    }

    /// The membership announcement for the whole room.
    pub(crate) fn players_updated(&self) -> Outbound {
        (
            Recipient::Room(self.id.clone()),
            ServerEvent::PlayersUpdated {
                room_id: self.id.clone(),
                players: self.player_infos(),
                turn: self.turn_index(),
            },
        )
    }

    // -- Membership ---------------------------------------------------------

    /// Seats `player` at the end of the seat order.
    pub(crate) fn join(&mut self, player: Player) -> Result<Vec<Outbound>, RoomError> {
        if self.phase != RoomPhase::Open {
            return Err(RoomError::InvalidPhase(self.id.clone(), self.phase));
        }
        if self.seat_of(player.connection_id).is_some() {
            return Err(RoomError::AlreadySeated(
                player.connection_id,
                self.id.clone(),
            ));
        }
        if let Some(max) = self.config.max_players {
            if self.players.len() >= max {
                return Err(RoomError::RoomFull(self.id.clone()));
            }
        }

        tracing::info!(
            room_id = %self.id,
            connection_id = %player.connection_id,
            name = %player.display_name,
            seat = self.players.len(),
            "player joined"
        );
        self.players.push(player);

        Ok(vec![self.players_updated()])
    }

    /// Removes the player on `connection_id`, keeping the turn pointer on a
    /// live seat.
    pub(crate) fn leave(&mut self, connection_id: ConnectionId) -> Result<Departure, RoomError> {
        let seat = self
            .seat_of(connection_id)
            .ok_or_else(|| RoomError::NotInRoom(connection_id, self.id.clone()))?;
        let player = self.players.remove(seat);

        if self.phase == RoomPhase::Playing {
            self.turn = turn_after_leave(self.turn, seat, self.players.len());
        }

        tracing::info!(
            room_id = %self.id,
            %connection_id,
            seat,
            players = self.players.len(),
            "player left"
        );

        let outbound = if self.players.is_empty() {
            Vec::new()
        } else {
            vec![self.players_updated()]
        };

        Ok(Departure {
            room_id: self.id.clone(),
            seat,
            player,
            remaining: self.player_infos(),
            room_removed: false,
            outbound,
        })
    }

    /// Broadcasts a chat line from a seated player.
    pub(crate) fn chat(
        &self,
        connection_id: ConnectionId,
        message: String,
    ) -> Result<Vec<Outbound>, RoomError> {
        let seat = self
            .seat_of(connection_id)
            .ok_or_else(|| RoomError::NotInRoom(connection_id, self.id.clone()))?;

        Ok(vec![(
            Recipient::Room(self.id.clone()),
            ServerEvent::NewMessage {
                room_id: self.id.clone(),
                from: self.players[seat].display_name.clone(),
                message,
            },
        )])
    }

    // -- Turn engine --------------------------------------------------------

    /// Deals from `deck` in seat order and moves the room to `Playing`.
    ///
    /// `deck` is expected to be freshly shuffled. Each player's hand is
    /// addressed to that player only.
    pub(crate) fn start_game(&mut self, deck: Vec<Card>) -> Result<Vec<Outbound>, RoomError> {
        if self.phase != RoomPhase::Open {
            return Err(RoomError::InvalidPhase(self.id.clone(), self.phase));
        }
        let needed = self.config.cards_needed(self.players.len());
        let hands = deal(&deck, self.players.len(), self.config.hand_size).ok_or_else(|| {
            RoomError::DeckTooSmall {
                room_id: self.id.clone(),
                needed,
                available: deck.len(),
            }
        })?;

        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.hand = hand;
        }
        self.turn = 0;
        self.pot.clear();
        self.phase = RoomPhase::Playing;

        tracing::info!(
            room_id = %self.id,
            players = self.players.len(),
            "game started"
        );

        let mut outbound = Vec::with_capacity(self.players.len() + 1);
        outbound.push((
            Recipient::Room(self.id.clone()),
            ServerEvent::GameStarted {
                room_id: self.id.clone(),
                players: self
                    .players
                    .iter()
                    .map(|p| p.display_name.clone())
                    .collect(),
                turn: self.turn,
            },
        ));
        for player in &self.players {
            outbound.push(self.hand_update(player));
        }
        Ok(outbound)
    }

    /// Plays `card` for `connection_id` if it is their turn and they hold
    /// it. Anything else leaves the room untouched.
    pub(crate) fn play_card(
        &mut self,
        connection_id: ConnectionId,
        card: Card,
    ) -> (PlayOutcome, Vec<Outbound>) {
        if self.phase != RoomPhase::Playing {
            return self.reject(connection_id, card, PlayOutcome::NotPlaying);
        }
        let Some(seat) = self.seat_of(connection_id) else {
            return self.reject(connection_id, card, PlayOutcome::NotSeated);
        };
        if seat != self.turn {
            return self.reject(connection_id, card, PlayOutcome::NotYourTurn);
        }
        let Some(slot) = self.players[seat].hand.iter().position(|c| *c == card) else {
            return self.reject(connection_id, card, PlayOutcome::CardNotHeld);
        };

        let player = &mut self.players[seat];
        player.hand.remove(slot);
        self.pot.push(PotEntry {
            name: player.display_name.clone(),
            card,
        });
        self.turn = next_turn(self.turn, self.players.len());

        let player = &self.players[seat];
        tracing::debug!(
            room_id = %self.id,
            %connection_id,
            %card,
            next_turn = self.turn,
            "card played"
        );

        let outbound = vec![
            (
                Recipient::Room(self.id.clone()),
                ServerEvent::CardPlayed {
                    room_id: self.id.clone(),
                    name: player.display_name.clone(),
                    card,
                    pot: self.pot.clone(),
                    turn: self.turn,
                },
            ),
            self.hand_update(player),
        ];
        (PlayOutcome::Accepted, outbound)
    }

    fn reject(
        &self,
        connection_id: ConnectionId,
        card: Card,
        outcome: PlayOutcome,
    ) -> (PlayOutcome, Vec<Outbound>) {
        tracing::debug!(
            room_id = %self.id,
            %connection_id,
            %card,
            ?outcome,
            "play rejected"
        );
        (outcome, Vec::new())
    }

    fn hand_update(&self, player: &Player) -> Outbound {
        (
            Recipient::Connection(player.connection_id),
            ServerEvent::YourCards {
                room_id: self.id.clone(),
                cards: player.hand.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn ordered_deck() -> Vec<Card> {
        (1..=40).map(Card).collect()
    }

    fn table_with(names: &[&str]) -> Room {
        let mut room = Room::new(
            RoomId::from("T1"),
            RoomConfig::table(),
            Player::new(conn(1), names[0]),
        );
        for (i, name) in names.iter().enumerate().skip(1) {
            room.join(Player::new(conn(i as u64 + 1), *name)).unwrap();
        }
        room
    }

    #[test]
    fn test_new_room_is_open_with_founder() {
        let room = table_with(&["Alice"]);
        assert_eq!(room.phase(), RoomPhase::Open);
        assert_eq!(room.len(), 1);
        assert_eq!(room.turn_index(), None);
    }

    #[test]
    fn test_join_appends_and_announces_to_room() {
        let mut room = table_with(&["Alice"]);
        let out = room.join(Player::new(conn(2), "Bob")).unwrap();

        assert_eq!(room.seat_of(conn(2)), Some(1));
        assert_eq!(out.len(), 1);
        match &out[0] {
            (Recipient::Room(id), ServerEvent::PlayersUpdated { players, .. }) => {
                assert_eq!(id, room.id());
                let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, ["Alice", "Bob"]);
            }
            other => panic!("expected PlayersUpdated broadcast, got {other:?}"),
        }
    }

    #[test]
    fn test_join_full_table() {
        let mut room = table_with(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let result = room.join(Player::new(conn(99), "I"));
        assert!(matches!(result, Err(RoomError::RoomFull(_))));
        assert_eq!(room.len(), 8);
    }

    #[test]
    fn test_join_while_playing_is_refused() {
        let mut room = table_with(&["Alice", "Bob"]);
        room.start_game(ordered_deck()).unwrap();
        let result = room.join(Player::new(conn(3), "Carol"));
        assert!(matches!(
            result,
            Err(RoomError::InvalidPhase(_, RoomPhase::Playing))
        ));
    }

    #[test]
    fn test_start_game_deals_in_seat_order_and_hides_hands() {
        let mut room = table_with(&["Alice", "Bob"]);
        let out = room.start_game(ordered_deck()).unwrap();

        assert_eq!(room.phase(), RoomPhase::Playing);
        assert_eq!(room.turn_index(), Some(0));
        assert!(room.pot().is_empty());
        assert_eq!(room.hand(conn(1)).unwrap(), &ordered_deck()[0..5]);
        assert_eq!(room.hand(conn(2)).unwrap(), &ordered_deck()[5..10]);

        // One broadcast, then one private hand per player.
        assert!(matches!(
            out[0],
            (Recipient::Room(_), ServerEvent::GameStarted { turn: 0, .. })
        ));
        for (recipient, event) in &out[1..] {
            let ServerEvent::YourCards { cards, .. } = event else {
                panic!("expected YourCards, got {event:?}");
            };
            let Recipient::Connection(to) = recipient else {
                panic!("hand sent to {recipient:?}");
            };
            assert_eq!(room.hand(*to).unwrap(), cards.as_slice());
        }
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_start_game_twice_is_refused() {
        let mut room = table_with(&["Alice", "Bob"]);
        room.start_game(ordered_deck()).unwrap();
        let hands_before = room.hand(conn(1)).unwrap().to_vec();

        let result = room.start_game(ordered_deck());
        assert!(matches!(result, Err(RoomError::InvalidPhase(..))));
        assert_eq!(room.hand(conn(1)).unwrap(), hands_before.as_slice());
    }

    #[test]
    fn test_start_game_with_short_deck_is_refused() {
        let mut room = table_with(&["Alice", "Bob"]);
        let result = room.start_game((1..=9).map(Card).collect());
        assert!(matches!(
            result,
            Err(RoomError::DeckTooSmall {
                needed: 10,
                available: 9,
                ..
            })
        ));
        assert_eq!(room.phase(), RoomPhase::Open);
    }

    #[test]
    fn test_play_card_accepted() {
        let mut room = table_with(&["Alice", "Bob"]);
        room.start_game(ordered_deck()).unwrap();

        let (outcome, out) = room.play_card(conn(1), Card(3));

        assert_eq!(outcome, PlayOutcome::Accepted);
        assert_eq!(
            room.pot(),
            &[PotEntry {
                name: "Alice".into(),
                card: Card(3)
            }]
        );
        assert_eq!(room.turn_index(), Some(1));
        assert!(!room.hand(conn(1)).unwrap().contains(&Card(3)));
        assert_eq!(room.hand(conn(1)).unwrap().len(), 4);

        assert!(matches!(
            &out[0],
            (Recipient::Room(_), ServerEvent::CardPlayed { turn: 1, .. })
        ));
        assert_eq!(out[1].0, Recipient::Connection(conn(1)));
    }

    #[test]
    fn test_play_card_out_of_turn_changes_nothing() {
        let mut room = table_with(&["Alice", "Bob"]);
        room.start_game(ordered_deck()).unwrap();

        let (outcome, out) = room.play_card(conn(2), Card(6));

        assert_eq!(outcome, PlayOutcome::NotYourTurn);
        assert!(out.is_empty());
        assert!(room.pot().is_empty());
        assert_eq!(room.turn_index(), Some(0));
        assert_eq!(room.hand(conn(2)).unwrap().len(), 5);
    }

    #[test]
    fn test_play_card_not_held_changes_nothing() {
        let mut room = table_with(&["Alice", "Bob"]);
        room.start_game(ordered_deck()).unwrap();

        // Card 6 is Bob's.
        let (outcome, out) = room.play_card(conn(1), Card(6));

        assert_eq!(outcome, PlayOutcome::CardNotHeld);
        assert!(out.is_empty());
        assert!(room.pot().is_empty());
        assert_eq!(room.turn_index(), Some(0));
    }

    #[test]
    fn test_play_card_before_start() {
        let mut room = table_with(&["Alice", "Bob"]);
        let (outcome, _) = room.play_card(conn(1), Card(1));
        assert_eq!(outcome, PlayOutcome::NotPlaying);
    }

    #[test]
    fn test_play_card_from_stranger() {
        let mut room = table_with(&["Alice", "Bob"]);
        room.start_game(ordered_deck()).unwrap();
        let (outcome, _) = room.play_card(conn(42), Card(1));
        assert_eq!(outcome, PlayOutcome::NotSeated);
    }

    #[test]
    fn test_leave_before_turn_keeps_current_player() {
        let mut room = table_with(&["Alice", "Bob", "Carol"]);
        room.start_game(ordered_deck()).unwrap();
        room.play_card(conn(1), Card(1));
        room.play_card(conn(2), Card(6));
        assert_eq!(room.turn_index(), Some(2)); // Carol

        let departure = room.leave(conn(1)).unwrap();
        assert_eq!(departure.seat, 0);
        assert_eq!(room.turn_index(), Some(1));

        let (outcome, _) = room.play_card(conn(3), Card(11));
        assert_eq!(outcome, PlayOutcome::Accepted);
    }

    #[test]
    fn test_leave_on_turn_passes_to_next_seat() {
        let mut room = table_with(&["Alice", "Bob", "Carol"]);
        room.start_game(ordered_deck()).unwrap();
        room.play_card(conn(1), Card(1));
        assert_eq!(room.turn_index(), Some(1)); // Bob

        room.leave(conn(2)).unwrap();

        assert_eq!(room.turn_index(), Some(1)); // Carol slid into seat 1
        let (outcome, _) = room.play_card(conn(3), Card(11));
        assert_eq!(outcome, PlayOutcome::Accepted);
        assert_eq!(room.turn_index(), Some(0));
    }

    #[test]
    fn test_leave_announces_remaining_players_with_turn() {
        let mut room = table_with(&["Alice", "Bob", "Carol"]);
        room.start_game(ordered_deck()).unwrap();
        room.play_card(conn(1), Card(1));
        room.play_card(conn(2), Card(6));

        let departure = room.leave(conn(1)).unwrap();

        assert_eq!(departure.remaining.len(), 2);
        assert!(matches!(
            &departure.outbound[..],
            [(Recipient::Room(_), ServerEvent::PlayersUpdated { turn: Some(1), .. })]
        ));
    }

    #[test]
    fn test_last_leave_produces_no_broadcast() {
        let mut room = table_with(&["Alice"]);
        let departure = room.leave(conn(1)).unwrap();
        assert!(room.is_empty());
        assert!(departure.outbound.is_empty());
    }

    #[test]
    fn test_leave_unknown_connection() {
        let mut room = table_with(&["Alice"]);
        assert!(matches!(
            room.leave(conn(7)),
            Err(RoomError::NotInRoom(..))
        ));
    }

    #[test]
    fn test_chat_requires_seat() {
        let room = table_with(&["Alice"]);
        let out = room.chat(conn(1), "hi".into()).unwrap();
        assert!(matches!(
            &out[0].1,
            ServerEvent::NewMessage { from, message, .. } if from == "Alice" && message == "hi"
        ));
        assert!(room.chat(conn(2), "psst".into()).is_err());
    }
}
