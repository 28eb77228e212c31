//! Effect targeting.
//!
//! Selectors are relative to the acting side: for an enemy actor, `ENEMY`
//! means the player. Expansion happens at resolution time, so an enemy
//! killed by an earlier effect of the same card is no longer a target.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::effect::CardEffect;
use crate::core::{BattleError, BattleResult, BattleState, CombatantId, GameRng};

/// Targets of one effect. Encounters rarely exceed four combatants.
pub type TargetSet = SmallVec<[CombatantId; 4]>;

/// How an effect picks its targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSelector {
    /// The actor itself.
    #[serde(rename = "SELF")]
    SelfTarget,
    /// The chosen enemy (player actor) or the player (enemy actor).
    #[serde(rename = "ENEMY")]
    Enemy,
    /// Every living opponent at resolution time.
    #[serde(rename = "ALL_ENEMIES")]
    AllEnemies,
    /// One living opponent picked on the battle RNG.
    #[serde(rename = "RANDOM_ENEMY")]
    RandomEnemy,
}

impl TargetSelector {
    /// Whether the actor has to name a target for this selector.
    #[must_use]
    pub fn requires_choice(self, actor: CombatantId) -> bool {
        self == TargetSelector::Enemy && actor.is_player()
    }
}

/// Check if any effect in the list needs a chosen target.
#[must_use]
pub fn needs_target(effects: &[CardEffect], actor: CombatantId) -> bool {
    effects.iter().any(|e| e.selector().requires_choice(actor))
}

/// Validate a play-time target choice before anything is mutated.
///
/// A chosen target must be a living enemy. It is required when any
/// effect uses the `ENEMY` selector.
pub fn validate_choice(
    state: &BattleState,
    effects: &[CardEffect],
    actor: CombatantId,
    chosen: Option<CombatantId>,
) -> BattleResult<()> {
    match chosen {
        Some(target @ CombatantId::Enemy(_)) if state.is_alive(target) => Ok(()),
        Some(target) => Err(BattleError::InvalidTarget(Some(target))),
        None if needs_target(effects, actor) => Err(BattleError::InvalidTarget(None)),
        None => Ok(()),
    }
}

/// Expand a selector into concrete targets.
///
/// Returns an empty set when the chosen enemy has already died during
/// this resolution. `RANDOM_ENEMY` consumes one RNG draw.
pub fn expand_targets(
    selector: TargetSelector,
    actor: CombatantId,
    chosen: Option<CombatantId>,
    state: &BattleState,
    rng: &mut GameRng,
) -> BattleResult<TargetSet> {
    let mut targets = TargetSet::new();

    match selector {
        TargetSelector::SelfTarget => targets.push(actor),

        TargetSelector::Enemy if actor.is_player() => match chosen {
            Some(target @ CombatantId::Enemy(slot)) if state.enemy(slot).is_some() => {
                if state.is_alive(target) {
                    targets.push(target);
                }
            }
            other => return Err(BattleError::InvalidTarget(other)),
        },

        TargetSelector::Enemy => {
            if state.player.is_alive() {
                targets.push(CombatantId::Player);
            }
        }

        TargetSelector::AllEnemies => {
            let living = state.living_opponents(actor);
            if living.is_empty() {
                return Err(BattleError::NoValidTarget);
            }
            targets.extend(living);
        }

        TargetSelector::RandomEnemy => {
            let living = state.living_opponents(actor);
            let index = rng.gen_index(living.len()).ok_or(BattleError::NoValidTarget)?;
            targets.push(living[index]);
        }
    }

    Ok(targets)
}
