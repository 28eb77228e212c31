//! Encounter definitions.

use serde::{Deserialize, Serialize};

use crate::core::{EncounterId, EnemyId};
use crate::status::StatusEffect;

/// Encounter difficulty tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Elite,
    Boss,
}

/// Optional per-encounter rule tweaks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialRules {
    /// Block every enemy starts with. Not kept past their first turn.
    #[serde(default)]
    pub starting_block: Option<i32>,
    /// Status put on the player when the battle starts.
    #[serde(default)]
    pub player_debuff: Option<StatusEffect>,
    /// The battle is lost once this many turns have been played.
    #[serde(default)]
    pub turn_limit: Option<u32>,
}

fn default_act() -> u32 {
    1
}

/// A fight: which enemies, in which slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterData {
    pub id: EncounterId,
    pub name: String,
    /// Enemy ids in slot order. Duplicates spawn separate instances.
    pub enemies: Vec<EnemyId>,
    #[serde(default = "default_act")]
    pub act: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub special_rules: SpecialRules,
}

impl EncounterData {
    pub fn new(id: impl Into<EncounterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enemies: Vec::new(),
            act: 1,
            difficulty: Difficulty::Normal,
            special_rules: SpecialRules::default(),
        }
    }

    #[must_use]
    pub fn with_enemy(mut self, enemy: impl Into<EnemyId>) -> Self {
        self.enemies.push(enemy.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_starting_block(mut self, block: i32) -> Self {
        self.special_rules.starting_block = Some(block);
        self
    }

    #[must_use]
    pub fn with_player_debuff(mut self, status: StatusEffect) -> Self {
        self.special_rules.player_debuff = Some(status);
        self
    }

    #[must_use]
    pub fn with_turn_limit(mut self, turns: u32) -> Self {
        self.special_rules.turn_limit = Some(turns);
        self
    }
}
