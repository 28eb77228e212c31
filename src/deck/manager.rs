//! Pile manager for card locations and movement.
//!
//! `DeckPiles` owns the player's four battle piles and an index of which
//! pile each instance sits in. It supports:
//! - Drawing from the front of the draw pile, reshuffling the discard pile
//!   when the draw pile runs out
//! - End-of-turn discard that keeps RETAIN cards in hand
//! - Moving a played card to discard or exhaust
//! - A partition check for tests
//!
//! Piles are `im::Vector`s so the whole manager clones in O(1).

use std::hash::BuildHasherDefault;

use im::Vector;
use rustc_hash::{FxHashSet, FxHasher};
use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;
use crate::core::{GameRng, InstanceId};

type PileIndex = im::HashMap<InstanceId, Pile, BuildHasherDefault<FxHasher>>;

/// One of the player's four battle piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Draw,
    Hand,
    Discard,
    Exhaust,
}

/// What a `draw` call did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Instances moved to hand, in draw order.
    pub drawn: Vec<InstanceId>,
    /// Size of each discard pile shuffled back into the draw pile.
    pub reshuffles: Vec<usize>,
}

/// The player's hand, draw, discard and exhaust piles.
///
/// ## Usage
///
/// ```
/// use synth_battle::cards::CardInstance;
/// use synth_battle::core::{GameRng, InstanceId};
/// use synth_battle::deck::{DeckPiles, Pile};
///
/// let deck = (0..6).map(|i| CardInstance::new(InstanceId::new(i), "card_strike"));
/// let mut piles = DeckPiles::new(deck);
/// let mut rng = GameRng::new(42);
///
/// let report = piles.draw(5, &mut rng);
/// assert_eq!(report.drawn.len(), 5);
/// assert_eq!(piles.locate(InstanceId::new(0)), Some(Pile::Hand));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckPiles {
    draw: Vector<CardInstance>,
    hand: Vector<CardInstance>,
    discard: Vector<CardInstance>,
    exhaust: Vector<CardInstance>,

    /// Card locations: instance -> pile
    locations: PileIndex,
}

impl DeckPiles {
    /// Put the whole deck in the draw pile, in the given order.
    pub fn new(deck: impl IntoIterator<Item = CardInstance>) -> Self {
        Self::from_parts(deck, [], [], [])
    }

    /// Build piles with explicit contents.
    pub fn from_parts(
        draw: impl IntoIterator<Item = CardInstance>,
        hand: impl IntoIterator<Item = CardInstance>,
        discard: impl IntoIterator<Item = CardInstance>,
        exhaust: impl IntoIterator<Item = CardInstance>,
    ) -> Self {
        let mut piles = Self::default();
        for (pile, cards) in [
            (Pile::Draw, draw.into_iter().collect::<Vec<_>>()),
            (Pile::Hand, hand.into_iter().collect()),
            (Pile::Discard, discard.into_iter().collect()),
            (Pile::Exhaust, exhaust.into_iter().collect()),
        ] {
            for card in cards {
                piles.push(pile, card);
            }
        }
        piles
    }

    fn pile_mut(&mut self, pile: Pile) -> &mut Vector<CardInstance> {
        match pile {
            Pile::Draw => &mut self.draw,
            Pile::Hand => &mut self.hand,
            Pile::Discard => &mut self.discard,
            Pile::Exhaust => &mut self.exhaust,
        }
    }

    fn push(&mut self, pile: Pile, card: CardInstance) {
        self.locations.insert(card.instance_id, pile);
        self.pile_mut(pile).push_back(card);
    }

    /// Get a pile's contents in order (front first).
    #[must_use]
    pub fn pile(&self, pile: Pile) -> &Vector<CardInstance> {
        match pile {
            Pile::Draw => &self.draw,
            Pile::Hand => &self.hand,
            Pile::Discard => &self.discard,
            Pile::Exhaust => &self.exhaust,
        }
    }

    #[must_use]
    pub fn hand(&self) -> &Vector<CardInstance> {
        &self.hand
    }

    #[must_use]
    pub fn draw_pile(&self) -> &Vector<CardInstance> {
        &self.draw
    }

    #[must_use]
    pub fn discard_pile(&self) -> &Vector<CardInstance> {
        &self.discard
    }

    #[must_use]
    pub fn exhaust_pile(&self) -> &Vector<CardInstance> {
        &self.exhaust
    }

    /// Which pile holds an instance.
    #[must_use]
    pub fn locate(&self, id: InstanceId) -> Option<Pile> {
        self.locations.get(&id).copied()
    }

    /// Get a card in hand.
    #[must_use]
    pub fn hand_card(&self, id: InstanceId) -> Option<&CardInstance> {
        self.hand.iter().find(|c| c.instance_id == id)
    }

    /// Get a card in hand mutably.
    pub fn hand_card_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.hand.iter_mut().find(|c| c.instance_id == id)
    }

    /// Total cards across all piles.
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len() + self.exhaust.len()
    }

    /// Shuffle the draw pile in place.
    pub fn shuffle_draw_pile(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<_> = std::mem::take(&mut self.draw).into_iter().collect();
        rng.shuffle(&mut cards);
        self.draw = cards.into_iter().collect();
    }

    /// Move up to `count` cards from the front of the draw pile to hand.
    ///
    /// When the draw pile empties, the discard pile is shuffled into it and
    /// drawing continues. Stops short without error once both are empty.
    pub fn draw(&mut self, count: usize, rng: &mut GameRng) -> DrawReport {
        let mut report = DrawReport::default();

        while report.drawn.len() < count {
            if self.draw.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                report.reshuffles.push(self.reshuffle_discard(rng));
            }

            let Some(card) = self.draw.pop_front() else {
                break;
            };
            report.drawn.push(card.instance_id);
            self.push(Pile::Hand, card);
        }

        report
    }

    /// Shuffle the whole discard pile onto the back of the draw pile.
    fn reshuffle_discard(&mut self, rng: &mut GameRng) -> usize {
        let mut cards: Vec<_> = std::mem::take(&mut self.discard).into_iter().collect();
        rng.shuffle(&mut cards);

        let count = cards.len();
        for card in cards {
            self.push(Pile::Draw, card);
        }
        count
    }

    /// Move every non-retained card from hand to discard.
    ///
    /// `retained` decides which cards stay. Returns the discarded ids in
    /// hand order.
    pub fn discard_hand(&mut self, retained: impl Fn(&CardInstance) -> bool) -> Vec<InstanceId> {
        let (kept, discarded): (Vector<_>, Vector<_>) = std::mem::take(&mut self.hand)
            .into_iter()
            .partition(|card| retained(card));

        self.hand = kept;
        let ids = discarded.iter().map(|c| c.instance_id).collect();
        for card in discarded {
            self.push(Pile::Discard, card);
        }
        ids
    }

    /// Move an instance from whichever pile holds it to `destination`.
    ///
    /// Returns the pile it came from, or `None` if it isn't here.
    pub fn move_to(&mut self, id: InstanceId, destination: Pile) -> Option<Pile> {
        let source = self.locate(id)?;
        if source == destination {
            return Some(source);
        }

        let from = self.pile_mut(source);
        let index = from.iter().position(|c| c.instance_id == id)?;
        let card = from.remove(index);
        self.push(destination, card);
        Some(source)
    }

    /// Move an instance to the discard pile (after it is played).
    pub fn discard(&mut self, id: InstanceId) -> Option<Pile> {
        self.move_to(id, Pile::Discard)
    }

    /// Remove an instance from play for the rest of the battle.
    pub fn exhaust(&mut self, id: InstanceId) -> Option<Pile> {
        self.move_to(id, Pile::Exhaust)
    }

    /// Clear per-turn modifiers on every card.
    pub fn reset_turn_modifiers(&mut self) {
        for pile in [Pile::Draw, Pile::Hand, Pile::Discard, Pile::Exhaust] {
            for card in self.pile_mut(pile).iter_mut() {
                if card.has_turn_modifiers() {
                    card.reset_turn_modifiers();
                }
            }
        }
    }

    /// Every instance id, pile by pile.
    #[must_use]
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        [&self.draw, &self.hand, &self.discard, &self.exhaust]
            .into_iter()
            .flat_map(|pile| pile.iter().map(|c| c.instance_id))
            .collect()
    }

    /// Check that the four piles partition exactly `expected`: no card
    /// missing, none duplicated, none foreign, and the location index agrees.
    #[must_use]
    pub fn verify_partition(&self, expected: &[InstanceId]) -> bool {
        let mut seen = FxHashSet::default();
        for pile in [Pile::Draw, Pile::Hand, Pile::Discard, Pile::Exhaust] {
            for card in self.pile(pile) {
                if !seen.insert(card.instance_id) || self.locate(card.instance_id) != Some(pile) {
                    return false;
                }
            }
        }

        let wanted: FxHashSet<_> = expected.iter().copied().collect();
        wanted.len() == expected.len() && seen == wanted && self.locations.len() == seen.len()
    }
}
