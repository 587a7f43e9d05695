//! Turn-pointer arithmetic and dealing.
//!
//! Pure functions over seat indices so the rotation rules can be tested
//! without building a room.

use cardroom_protocol::Card;

/// The seat that plays after `turn` at a table of `seats`.
pub(crate) fn next_turn(turn: usize, seats: usize) -> usize {
    (turn + 1) % seats
}

/// The turn pointer after seat `removed` leaves, with `remaining` seats
/// left.
///
/// Seats after `removed` shift down by one. If the leaver sat before the
/// pointer, the pointer follows the player it pointed at. If the leaver
/// held the turn, the player who slid into that seat plays next, wrapping
/// to seat 0 when the last seat left.
pub(crate) fn turn_after_leave(turn: usize, removed: usize, remaining: usize) -> usize {
    if remaining == 0 {
        return 0;
    }
    if removed < turn {
        turn - 1
    } else {
        turn % remaining
    }
}

/// Splits the top of `deck` into `seats` hands of `hand_size` cards, seat
/// 0 first. Returns `None` if the deck is too short.
pub(crate) fn deal(deck: &[Card], seats: usize, hand_size: usize) -> Option<Vec<Vec<Card>>> {
    let needed = seats.checked_mul(hand_size)?;
    if needed > deck.len() {
        return None;
    }
    if hand_size == 0 {
        return Some(vec![Vec::new(); seats]);
    }
    Some(
        deck[..needed]
            .chunks(hand_size)
            .map(<[Card]>::to_vec)
            .collect(),
    )
}
