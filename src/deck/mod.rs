//! Deck flow: the player's draw, hand, discard and exhaust piles.
//!
//! Cards move between piles; they are never copied. The four piles always
//! partition the battle's card set, which `DeckPiles::verify_partition`
//! checks.

mod manager;

pub use manager::{DeckPiles, DrawReport, Pile};
