//! Effect resolution - executing effects on battle state.
//!
//! The `EffectResolver` applies an ordered effect list (from a card or an
//! enemy skill) against its targets. Each resolved (effect, target) pair
//! appends exactly one log entry. Resolution stops as soon as the battle
//! reaches a terminal condition or the actor dies.

use super::effect::{CardEffect, EffectCondition, EffectKind};
use super::targeting::expand_targets;
use crate::core::{
    BattleError, BattleResult, BattleState, CombatantId, GameRng, LogEvent, SkipReason,
};
use crate::status::{StatusKind, TickTiming};

/// The actor resolving effects plus card-level modifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectSource {
    pub actor: CombatantId,
    /// Card or skill name, used as the log entry's action.
    pub label: String,
    /// Added to every DAMAGE effect (a card's `temp_buff`).
    pub damage_bonus: i32,
    /// All damage ignores block (PIERCING tag).
    pub piercing: bool,
}

impl EffectSource {
    pub fn new(actor: CombatantId, label: impl Into<String>) -> Self {
        Self {
            actor,
            label: label.into(),
            damage_bonus: 0,
            piercing: false,
        }
    }

    #[must_use]
    pub fn with_damage_bonus(mut self, bonus: i32) -> Self {
        self.damage_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_piercing(mut self, piercing: bool) -> Self {
        self.piercing = piercing;
        self
    }
}

/// Resolves effects on battle state.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve an effect list left to right.
    ///
    /// `chosen` is the play-time target for `ENEMY` selectors and must
    /// already be validated.
    pub fn resolve(
        state: &mut BattleState,
        rng: &mut GameRng,
        source: &EffectSource,
        effects: &[CardEffect],
        chosen: Option<CombatantId>,
    ) -> BattleResult<()> {
        for effect in effects {
            if state.terminal_outcome().is_some() || !state.is_alive(source.actor) {
                break;
            }

            let targets = expand_targets(effect.selector(), source.actor, chosen, state, rng)?;
            if targets.is_empty() {
                state.record(
                    Some(source.actor),
                    source.label.as_str(),
                    chosen,
                    LogEvent::EffectSkipped {
                        reason: SkipReason::TargetDefeated,
                    },
                );
                continue;
            }

            for target in targets {
                if state.terminal_outcome().is_some() {
                    break;
                }
                Self::resolve_single(state, rng, source, effect, target)?;
            }
        }

        Ok(())
    }

    /// Resolve one effect against one target.
    pub fn resolve_single(
        state: &mut BattleState,
        rng: &mut GameRng,
        source: &EffectSource,
        effect: &CardEffect,
        target: CombatantId,
    ) -> BattleResult<()> {
        let actor = Some(source.actor);
        let label = source.label.as_str();

        if let Some(condition) = &effect.condition {
            if !Self::condition_holds(state, condition, source.actor, target) {
                state.record(
                    actor,
                    label,
                    Some(target),
                    LogEvent::EffectSkipped {
                        reason: SkipReason::ConditionNotMet,
                    },
                );
                return Ok(());
            }
        }

        let event = match &effect.kind {
            EffectKind::Damage { value, piercing } => {
                let modifier = state
                    .combatant(source.actor)
                    .map_or(0, |c| c.statuses.damage_modifier());
                let amount = (value + source.damage_bonus + modifier).max(0);
                let pierced = *piercing || source.piercing;

                let report = state
                    .combatant_mut(target)
                    .ok_or(BattleError::InvalidTarget(Some(target)))?
                    .take_damage(amount, pierced);
                Self::track_hp_loss(state, target, report.hp_loss);

                LogEvent::Damage {
                    amount,
                    blocked: report.blocked,
                    hp_loss: report.hp_loss,
                    pierced,
                    hp_after: report.hp_after,
                    block_after: report.block_after,
                }
            }

            EffectKind::Block { value } => {
                let block_after = state
                    .combatant_mut(target)
                    .ok_or(BattleError::InvalidTarget(Some(target)))?
                    .add_block(*value);
                LogEvent::Block {
                    amount: (*value).max(0),
                    block_after,
                }
            }

            EffectKind::Heal { value } => {
                let mut view = state
                    .combatant_mut(target)
                    .ok_or(BattleError::InvalidTarget(Some(target)))?;
                let amount = view.heal(*value);
                LogEvent::Heal {
                    amount,
                    hp_after: *view.current_hp,
                }
            }

            EffectKind::Draw { value } if target.is_player() => {
                let requested = (*value).max(0) as usize;
                let report = state.player.piles.draw(requested, rng);
                for cards in report.reshuffles {
                    state.record(
                        actor,
                        label,
                        Some(target),
                        LogEvent::Reshuffle {
                            cards: cards as u32,
                        },
                    );
                }
                LogEvent::Draw {
                    requested: requested as u32,
                    drawn: report.drawn,
                }
            }

            EffectKind::Energy { value } if target.is_player() => {
                let before = state.player.energy;
                let energy_after = state.player.set_energy(before + value);
                LogEvent::Energy {
                    delta: energy_after - before,
                    energy_after,
                }
            }

            EffectKind::Draw { .. } | EffectKind::Energy { .. } => LogEvent::EffectSkipped {
                reason: SkipReason::NotApplicable,
            },

            EffectKind::BuffDamage { .. }
            | EffectKind::Debuff { .. }
            | EffectKind::Slow { .. }
            | EffectKind::Dot { .. } => {
                let status = effect
                    .kind
                    .to_status()
                    .ok_or_else(|| BattleError::InvalidContent(effect.kind.name().to_string()))?;
                let (id, kind) = (status.id.clone(), status.kind);

                let view = state
                    .combatant_mut(target)
                    .ok_or(BattleError::InvalidTarget(Some(target)))?;
                let outcome = view.statuses.apply(status);
                let (magnitude, duration) = view
                    .statuses
                    .get(&id)
                    .map_or((0, 0), |s| (s.magnitude, s.duration));

                LogEvent::StatusApplied {
                    status: id,
                    kind,
                    outcome,
                    magnitude,
                    duration,
                }
            }
        };

        state.record(actor, label, Some(target), event);
        Ok(())
    }

    /// Check an effect's trigger condition for one target.
    #[must_use]
    pub fn condition_holds(
        state: &BattleState,
        condition: &EffectCondition,
        actor: CombatantId,
        target: CombatantId,
    ) -> bool {
        let (Some(actor), Some(target)) = (state.combatant(actor), state.combatant(target)) else {
            return false;
        };

        match condition {
            EffectCondition::TargetHasBlock => target.block > 0,
            EffectCondition::TargetHasStatus(id) => target.statuses.has(id),
            EffectCondition::TargetHpBelow(percent) => target.hp_below_percent(*percent),
            EffectCondition::SelfHpBelow(percent) => actor.hp_below_percent(*percent),
        }
    }

    /// Tick a combatant's statuses for one timing, applying recurring
    /// effects (Dot damage ignores block) and logging each tick.
    pub fn tick_statuses(state: &mut BattleState, owner: CombatantId, timing: TickTiming) {
        let Some(mut view) = state.combatant_mut(owner) else {
            return;
        };
        let ticks = view.statuses.tick(timing);

        let mut events = Vec::with_capacity(ticks.len());
        for tick in ticks {
            let (hp_loss, hp_after) = if tick.kind == StatusKind::Dot && tick.fired {
                let loss = view.lose_hp(tick.magnitude);
                (loss, Some(*view.current_hp))
            } else {
                (0, None)
            };

            events.push((
                hp_loss,
                LogEvent::StatusTicked {
                    status: tick.id,
                    kind: tick.kind,
                    magnitude: tick.magnitude,
                    remaining: tick.remaining,
                    expired: tick.expired,
                    hp_loss,
                    hp_after,
                },
            ));
        }

        for (hp_loss, event) in events {
            Self::track_hp_loss(state, owner, hp_loss);
            state.record(None, "tick", Some(owner), event);
        }
    }

    /// Add HP loss to the battle stats.
    fn track_hp_loss(state: &mut BattleState, target: CombatantId, hp_loss: i32) {
        if target.is_player() {
            state.stats.damage_taken += hp_loss;
        } else {
            state.stats.damage_dealt += hp_loss;
        }
    }
}
