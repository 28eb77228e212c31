//! Core battle types: ids, state, actions, RNG, configuration, errors, log.
//!
//! Everything here is shared by the status engine, deck flow, effect
//! resolver, enemy AI and the battle state machine.

pub mod entity;
pub mod rng;
pub mod config;
pub mod error;
pub mod action;
pub mod combatant;
pub mod log;
pub mod state;

pub use entity::{CardId, CombatantId, EncounterId, EnemyId, InstanceId, SkillId, StatusId};
pub use rng::{GameRng, GameRngState};
pub use config::{ConfigField, GameConfig};
pub use error::{BattleError, BattleResult};
pub use action::{Action, ActionRecord};
pub use combatant::{CombatantMut, CombatantRef, DamageReport};
pub use log::{BattleLog, BattleLogEntry, LogEvent, SkipReason, Vitals};
pub use state::{BattlePhase, BattleState, BattleStats, EncounterInstance, PlayerState};
