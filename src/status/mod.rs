//! Status effect engine: buffs and debuffs on any combatant.
//!
//! - `StatusEffect`: one status with magnitude and remaining duration
//! - `StatusKind`: the statuses the engine understands (fixed tick timing)
//! - `StatusList`: per-combatant storage with stack/replace and tick rules

mod effect;
mod list;

pub use effect::{StatusEffect, StatusKind, StatusType, TickTiming, PERMANENT};
pub use list::{ApplyOutcome, StatusList, StatusTick};
