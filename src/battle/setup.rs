//! Battle inputs: the content catalog and the player's loadout.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{CardInstance, CardRegistry};
use crate::core::{BattleError, BattleResult, CardId, GameConfig, InstanceId};
use crate::enemies::EnemyRegistry;

/// All content a battle may reference.
///
/// Shared between battles behind an `Arc`; a battle never mutates it.
#[derive(Clone, Debug, Default)]
pub struct ContentCatalog {
    pub cards: CardRegistry,
    pub enemies: EnemyRegistry,
}

impl ContentCatalog {
    #[must_use]
    pub fn new(cards: CardRegistry, enemies: EnemyRegistry) -> Self {
        Self { cards, enemies }
    }

    /// Load cards (a JSON array) and enemies/encounters (a JSON object).
    pub fn from_json(cards: &str, enemies: &str) -> BattleResult<Self> {
        Ok(Self {
            cards: CardRegistry::from_json(cards)?,
            enemies: EnemyRegistry::from_json(enemies)?,
        })
    }
}

/// What the player brings into a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLoadout {
    /// The full deck. Instance ids must be unique.
    pub deck: Vec<CardInstance>,
    pub current_hp: i32,
    pub max_hp: i32,
}

impl PlayerLoadout {
    /// A loadout at the configured starting HP.
    #[must_use]
    pub fn from_config(config: &GameConfig, deck: Vec<CardInstance>) -> Self {
        Self {
            deck,
            current_hp: config.starting_hp,
            max_hp: config.starting_max_hp,
        }
    }

    /// Build a deck from card ids, numbering instances from 0.
    #[must_use]
    pub fn deck_from_ids<I, C>(ids: I) -> Vec<CardInstance>
    where
        I: IntoIterator<Item = C>,
        C: Into<CardId>,
    {
        ids.into_iter()
            .enumerate()
            .map(|(i, id)| CardInstance::new(InstanceId::new(i as u32), id))
            .collect()
    }

    /// One copy of every starter card in the registry, sorted by id.
    #[must_use]
    pub fn starter(registry: &CardRegistry, config: &GameConfig) -> Self {
        let ids = registry.starters().into_iter().map(|c| c.id.clone());
        Self::from_config(config, Self::deck_from_ids(ids))
    }

    #[must_use]
    pub fn with_hp(mut self, current_hp: i32, max_hp: i32) -> Self {
        self.current_hp = current_hp;
        self.max_hp = max_hp;
        self
    }

    /// Check HP bounds, instance uniqueness, and that every card exists.
    pub fn validate(&self, cards: &CardRegistry) -> BattleResult<()> {
        if self.max_hp <= 0 || self.current_hp <= 0 || self.current_hp > self.max_hp {
            return Err(BattleError::InvalidContent(format!(
                "player hp {}/{} out of range",
                self.current_hp, self.max_hp
            )));
        }

        let mut seen = FxHashSet::default();
        for card in &self.deck {
            if !seen.insert(card.instance_id) {
                return Err(BattleError::InvalidContent(format!(
                    "duplicate card instance {}",
                    card.instance_id
                )));
            }
            cards.lookup(&card.card_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardData;

    fn registry() -> CardRegistry {
        let mut cards = CardRegistry::new();
        let mut strike = CardData::new("strike", "Strike", 1);
        strike.starter = true;
        cards.register(strike).unwrap();
        cards.register(CardData::new("bash", "Bash", 2)).unwrap();
        cards
    }

    #[test]
    fn test_deck_from_ids() {
        let deck = PlayerLoadout::deck_from_ids(["strike", "strike", "bash"]);
        assert_eq!(deck.len(), 3);
        assert_eq!(deck[2].instance_id, InstanceId::new(2));
        assert_eq!(deck[2].card_id, CardId::new("bash"));
    }

    #[test]
    fn test_starter() {
        let loadout = PlayerLoadout::starter(&registry(), &GameConfig::default());
        assert_eq!(loadout.deck.len(), 1);
        assert_eq!(loadout.current_hp, 80);
        assert!(loadout.validate(&registry()).is_ok());
    }

    #[test]
    fn test_validate() {
        let cards = registry();
        let config = GameConfig::default();

        let unknown = PlayerLoadout::from_config(&config, PlayerLoadout::deck_from_ids(["zap"]));
        assert_eq!(
            unknown.validate(&cards).unwrap_err(),
            BattleError::UnknownCard(CardId::new("zap"))
        );

        let mut dupes = PlayerLoadout::from_config(&config, PlayerLoadout::deck_from_ids(["strike"]));
        dupes.deck.push(dupes.deck[0].clone());
        assert!(dupes.validate(&cards).is_err());

        let dead = PlayerLoadout::from_config(&config, Vec::new()).with_hp(0, 80);
        assert!(dead.validate(&cards).is_err());
    }
}
