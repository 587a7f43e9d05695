//! The shuffler.

use cardroom_protocol::Card;
use rand::Rng;
use rand::seq::SliceRandom;

/// Returns the cards `1..=deck_size` in uniformly random order.
pub fn shuffle(deck_size: u16) -> Vec<Card> {
    shuffle_with(deck_size, &mut rand::rng())
}

/// Like [`shuffle`], drawing randomness from `rng`.
///
/// `SliceRandom::shuffle` is a Fisher–Yates shuffle, so every permutation
/// is equally likely given a uniform `rng`.
pub fn shuffle_with<R: Rng + ?Sized>(deck_size: u16, rng: &mut R) -> Vec<Card> {
    let mut deck: Vec<Card> = (1..=deck_size).map(Card).collect();
    deck.shuffle(rng);
    deck
}
