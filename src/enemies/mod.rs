//! Enemies: static definitions, per-battle instances, and intent AI.
//!
//! - `EnemyData` / `EnemySkill` / `AiPattern`: content, loaded from JSON
//! - `EncounterData`: which enemies a fight spawns, plus special rules
//! - `EnemyRegistry`: validated lookup for both
//! - `EnemyInstance`: HP, block, cooldowns and intent during a battle
//! - `EnemyAi`: pattern selection and weighted skill choice

mod definition;
mod encounter;
mod instance;
mod registry;
mod ai;

pub use definition::{
    AiCondition, AiPattern, Behavior, EnemyData, EnemyRewards, EnemySkill, EnemyType, IntentType,
    SkillEffect, WeightedSkill, MAX_SKILL_HITS,
};
pub use encounter::{Difficulty, EncounterData, SpecialRules};
pub use instance::{EnemyInstance, Intent};
pub use registry::EnemyRegistry;
pub use ai::{AiContext, EnemyAi, IntentDecision, Relaxation};
