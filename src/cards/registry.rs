//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition of the content set.
//! It provides fast lookup by `CardId` and can be loaded from JSON.

use rustc_hash::FxHashMap;

use super::definition::CardData;
use crate::core::{BattleError, BattleResult, CardId};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use synth_battle::cards::{CardRegistry, CardData};
/// use synth_battle::core::CardId;
/// use synth_battle::effects::CardEffect;
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(CardData::new("card_strike", "Strike", 1).with_effect(CardEffect::damage(6)))
///     .unwrap();
///
/// let found = registry.get(&CardId::new("card_strike")).unwrap();
/// assert_eq!(found.name, "Strike");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardData>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a JSON array of card definitions.
    pub fn from_json(json: &str) -> BattleResult<Self> {
        let cards: Vec<CardData> = serde_json::from_str(json)
            .map_err(|e| BattleError::InvalidContent(format!("cards: {}", e)))?;

        let mut registry = Self::new();
        for card in cards {
            registry.register(card)?;
        }
        Ok(registry)
    }

    /// Register a card definition.
    ///
    /// Fails with `InvalidContent` if the id is already taken.
    pub fn register(&mut self, card: CardData) -> BattleResult<()> {
        if self.cards.contains_key(&card.id) {
            return Err(BattleError::InvalidContent(format!(
                "duplicate card id {}",
                card.id
            )));
        }
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardData> {
        self.cards.get(id)
    }

    /// Get a card definition, failing with `UnknownCard`.
    pub fn lookup(&self, id: &CardId) -> BattleResult<&CardData> {
        self.get(id).ok_or_else(|| BattleError::UnknownCard(id.clone()))
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all definitions (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = &CardData> {
        self.cards.values()
    }

    /// Starter cards, sorted by id.
    #[must_use]
    pub fn starters(&self) -> Vec<&CardData> {
        let mut starters: Vec<_> = self.cards.values().filter(|c| c.starter).collect();
        starters.sort_by(|a, b| a.id.cmp(&b.id));
        starters
    }
}
