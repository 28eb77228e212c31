//! # synth-battle
//!
//! Turn-based combat core for a roguelike deckbuilder.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: all randomness flows through one `GameRng` owned by
//!    the battle. The same seed and the same player actions produce a
//!    byte-identical battle log.
//!
//! 2. **Transactional**: a rejected player action leaves the battle exactly
//!    as it was, RNG position and log included.
//!
//! 3. **Content-driven**: cards, enemies and encounters are plain data,
//!    loaded from JSON and validated up front.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) state checkpoints via `im-rs`.
//!   The battle clones its state before every action and restores it on
//!   failure.
//!
//! - **One effect pipeline**: cards and enemy skills both compile to
//!   `CardEffect` lists and go through the same `EffectResolver`.
//!
//! - **Structured log**: every resolved effect appends one `BattleLogEntry`
//!   carrying post-values, so the final HP and block of every combatant can
//!   be rebuilt from the log alone.
//!
//! ## Modules
//!
//! - `core`: ids, state, actions, RNG, configuration, errors, battle log
//! - `cards`: card definitions, instances and registry
//! - `deck`: draw, hand, discard and exhaust piles
//! - `status`: buffs and debuffs
//! - `effects`: card effects, targeting and resolution
//! - `enemies`: enemy content, instances and intent AI
//! - `battle`: the battle state machine

pub mod core;
pub mod cards;
pub mod deck;
pub mod status;
pub mod effects;
pub mod enemies;
pub mod battle;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, BattleError, BattleLog, BattleLogEntry, BattlePhase, BattleResult,
    BattleState, CardId, CombatantId, EncounterId, EnemyId, GameConfig, GameRng, GameRngState,
    InstanceId, LogEvent, SkillId, StatusId,
};

pub use crate::cards::{CardData, CardInstance, CardRegistry, CardTag};

pub use crate::deck::{DeckPiles, Pile};

pub use crate::status::{StatusEffect, StatusKind, StatusList};

pub use crate::effects::{CardEffect, EffectCondition, EffectKind, EffectResolver, TargetSelector};

pub use crate::enemies::{
    AiCondition, AiPattern, EncounterData, EnemyAi, EnemyData, EnemyInstance, EnemyRegistry,
    EnemySkill, Intent, IntentType, WeightedSkill,
};

pub use crate::battle::{
    start_battle, Battle, BattleHistory, BattleOutcome, ContentCatalog, PlayerLoadout, StepOutcome,
};
