//! Enemy and encounter registry.
//!
//! Enemies are validated when they are registered, so an encounter built
//! from a registry never trips over a dangling skill reference mid-battle.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::definition::EnemyData;
use super::encounter::EncounterData;
use crate::core::{BattleError, BattleResult, EncounterId, EnemyId};

/// On-disk layout of an enemy content file.
#[derive(Deserialize)]
struct EnemyContent {
    enemies: Vec<EnemyData>,
    #[serde(default)]
    encounters: Vec<EncounterData>,
}

/// Registry of enemy and encounter definitions.
#[derive(Clone, Debug, Default)]
pub struct EnemyRegistry {
    enemies: FxHashMap<EnemyId, EnemyData>,
    encounters: FxHashMap<EncounterId, EncounterData>,
}

impl EnemyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object `{ "enemies": [...], "encounters": [...] }`.
    ///
    /// Encounters may only reference enemies from the same document.
    pub fn from_json(json: &str) -> BattleResult<Self> {
        let content: EnemyContent = serde_json::from_str(json)
            .map_err(|e| BattleError::InvalidContent(format!("enemies: {}", e)))?;

        let mut registry = Self::new();
        for enemy in content.enemies {
            registry.register(enemy)?;
        }
        for encounter in content.encounters {
            registry.register_encounter(encounter)?;
        }
        Ok(registry)
    }

    /// Register an enemy after validating its AI data.
    pub fn register(&mut self, enemy: EnemyData) -> BattleResult<()> {
        enemy.validate()?;
        if self.enemies.contains_key(&enemy.id) {
            return Err(BattleError::InvalidContent(format!(
                "duplicate enemy id {}",
                enemy.id
            )));
        }
        self.enemies.insert(enemy.id.clone(), enemy);
        Ok(())
    }

    /// Register an encounter. Every enemy it lists must already be known.
    pub fn register_encounter(&mut self, encounter: EncounterData) -> BattleResult<()> {
        self.validate_encounter(&encounter)?;
        if self.encounters.contains_key(&encounter.id) {
            return Err(BattleError::InvalidContent(format!(
                "duplicate encounter id {}",
                encounter.id
            )));
        }
        self.encounters.insert(encounter.id.clone(), encounter);
        Ok(())
    }

    /// Check an encounter's enemy list against the registry.
    pub fn validate_encounter(&self, encounter: &EncounterData) -> BattleResult<()> {
        if encounter.enemies.is_empty() {
            return Err(BattleError::InvalidContent(format!(
                "{} has no enemies",
                encounter.id
            )));
        }
        for id in &encounter.enemies {
            self.lookup(id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &EnemyId) -> Option<&EnemyData> {
        self.enemies.get(id)
    }

    /// Get an enemy, failing with `UnknownEnemy`.
    pub fn lookup(&self, id: &EnemyId) -> BattleResult<&EnemyData> {
        self.get(id).ok_or_else(|| BattleError::UnknownEnemy(id.clone()))
    }

    #[must_use]
    pub fn encounter(&self, id: &EncounterId) -> Option<&EncounterData> {
        self.encounters.get(id)
    }

    /// Get an encounter, failing with `InvalidContent`.
    pub fn lookup_encounter(&self, id: &EncounterId) -> BattleResult<&EncounterData> {
        self.encounter(id)
            .ok_or_else(|| BattleError::InvalidContent(format!("unknown encounter {}", id)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Iterate over enemies (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = &EnemyData> {
        self.enemies.values()
    }

    /// Encounters for an act, sorted by id.
    #[must_use]
    pub fn encounters_in_act(&self, act: u32) -> Vec<&EncounterData> {
        let mut found: Vec<_> = self.encounters.values().filter(|e| e.act == act).collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }
}
