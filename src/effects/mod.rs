//! Effect system for cards and enemy skills.
//!
//! - `CardEffect` / `EffectKind`: atomic effects with per-kind payloads
//! - `EffectCondition`: per-target trigger conditions
//! - `TargetSelector`: how an effect picks targets, relative to the actor
//! - `EffectResolver`: applies effect lists to battle state
//!
//! Cards and enemy skills share this pipeline; an enemy skill compiles to
//! the equivalent `CardEffect` list before it resolves.

mod effect;
mod targeting;
mod resolver;

pub use effect::{CardEffect, EffectCondition, EffectKind, DEFAULT_STATUS_TURNS};
pub(crate) use effect::parse_percent;
pub use targeting::{expand_targets, needs_target, validate_choice, TargetSelector, TargetSet};
pub use resolver::{EffectResolver, EffectSource};
