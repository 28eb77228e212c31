//! Enemy intent selection.
//!
//! Choosing an intent is split in two steps:
//!
//! 1. `EnemyAi::decide` reads the enemy and the battle context and draws
//!    from the RNG. It never touches the enemy, so deciding twice from the
//!    same RNG position gives the same answer.
//! 2. `EnemyAi::commit` stores the intent and starts the skill's cooldown.
//!
//! Candidate filtering relaxes in steps when nothing is left: first the
//! cooldown exclusion is dropped, then the recent-use exclusion, and as a
//! last resort the pattern's first skill is forced.

use serde::{Deserialize, Serialize};

use super::definition::{AiCondition, AiPattern, EnemyData};
use super::instance::{EnemyInstance, Intent};
use crate::core::{BattleError, BattleResult, BattleState, GameConfig, GameRng, SkillId};

/// What the AI conditions can see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AiContext {
    /// Battle turn the intent is for.
    pub turn: u32,
    pub enemy_hp: i32,
    pub enemy_max_hp: i32,
    pub player_hp: i32,
    pub player_max_hp: i32,
}

impl AiContext {
    /// Build the context for one enemy from the battle state.
    #[must_use]
    pub fn new(state: &BattleState, enemy: &EnemyInstance) -> Self {
        Self {
            turn: state.turn,
            enemy_hp: enemy.current_hp,
            enemy_max_hp: enemy.max_hp,
            player_hp: state.player.current_hp,
            player_max_hp: state.player.max_hp,
        }
    }
}

fn below_percent(hp: i32, max_hp: i32, percent: u32) -> bool {
    i64::from(hp) * 100 < i64::from(max_hp) * i64::from(percent)
}

fn above_percent(hp: i32, max_hp: i32, percent: u32) -> bool {
    i64::from(hp) * 100 > i64::from(max_hp) * i64::from(percent)
}

impl AiCondition {
    /// Evaluate the condition. HP percentages are the enemy's own unless
    /// the condition names the player.
    #[must_use]
    pub fn holds(&self, ctx: &AiContext) -> bool {
        match *self {
            AiCondition::HpBelow(p) => below_percent(ctx.enemy_hp, ctx.enemy_max_hp, p),
            AiCondition::HpAbove(p) => above_percent(ctx.enemy_hp, ctx.enemy_max_hp, p),
            AiCondition::PlayerHpBelow(p) => below_percent(ctx.player_hp, ctx.player_max_hp, p),
            AiCondition::Turn(n) => ctx.turn == n,
            AiCondition::TurnAtLeast(n) => ctx.turn >= n,
            AiCondition::TurnEven => ctx.turn % 2 == 0,
            AiCondition::TurnOdd => ctx.turn % 2 == 1,
            AiCondition::EveryNTurns(n) => n > 0 && ctx.turn % n == 0,
            AiCondition::FirstTurn => ctx.turn == 1,
        }
    }
}

/// Which exclusions had to be dropped to find a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relaxation {
    /// Cooldown and recent-use exclusions both applied.
    None,
    /// A skill on cooldown was allowed.
    Cooldown,
    /// A recently used skill was allowed.
    Repetition,
    /// Every weight was zero; the first skill was forced.
    Forced,
}

/// Result of `EnemyAi::decide`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentDecision {
    /// Index into the enemy's `ai_patterns`.
    pub pattern: usize,
    pub skill: SkillId,
    pub relaxation: Relaxation,
}

/// Enemy intent selection.
pub struct EnemyAi;

impl EnemyAi {
    /// Pick the active pattern: the first conditional pattern whose
    /// conditions all hold, else the first unconditional one.
    pub fn select_pattern<'a>(
        data: &'a EnemyData,
        ctx: &AiContext,
    ) -> BattleResult<(usize, &'a AiPattern)> {
        let conditional = data
            .ai_patterns
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_unconditional() && p.conditions.iter().all(|c| c.holds(ctx)));

        conditional
            .or_else(|| {
                data.ai_patterns
                    .iter()
                    .enumerate()
                    .find(|(_, p)| p.is_unconditional())
            })
            .ok_or_else(|| BattleError::MisconfiguredAiPattern(data.id.clone()))
    }

    /// Choose the next skill. Consumes at most one RNG draw.
    pub fn decide(
        data: &EnemyData,
        enemy: &EnemyInstance,
        ctx: &AiContext,
        rng: &mut GameRng,
    ) -> BattleResult<IntentDecision> {
        let (pattern, active) = Self::select_pattern(data, ctx)?;

        let steps = [
            (true, true, Relaxation::None),
            (false, true, Relaxation::Cooldown),
            (false, false, Relaxation::Repetition),
        ];

        for (skip_cooldown, skip_recent, relaxation) in steps {
            let weights: Vec<u32> = active
                .skills
                .iter()
                .map(|entry| {
                    let excluded = (skip_cooldown && enemy.is_on_cooldown(&entry.skill_id))
                        || (skip_recent && enemy.recently_used(&entry.skill_id));
                    if excluded {
                        0
                    } else {
                        entry.weight
                    }
                })
                .collect();

            if let Some(index) = rng.choose_weighted(&weights) {
                return Ok(IntentDecision {
                    pattern,
                    skill: active.skills[index].skill_id.clone(),
                    relaxation,
                });
            }
        }

        let first = active
            .skills
            .first()
            .ok_or_else(|| BattleError::MisconfiguredAiPattern(data.id.clone()))?;
        Ok(IntentDecision {
            pattern,
            skill: first.skill_id.clone(),
            relaxation: Relaxation::Forced,
        })
    }

    /// Apply a decision: announce the intent and start the cooldown.
    /// The skill enters the anti-repeat window only once it resolves.
    pub fn commit(
        data: &EnemyData,
        enemy: &mut EnemyInstance,
        decision: &IntentDecision,
        config: &GameConfig,
    ) -> BattleResult<Intent> {
        let skill = data.lookup_skill(&decision.skill)?;
        let intent = Intent::from_skill(skill, data.damage, config);

        enemy.set_cooldown(skill.id.clone(), skill.cooldown);
        enemy.current_intent = Some(intent.clone());
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::{EnemySkill, IntentType, WeightedSkill};

    fn ctx(turn: u32) -> AiContext {
        AiContext {
            turn,
            enemy_hp: 40,
            enemy_max_hp: 40,
            player_hp: 80,
            player_max_hp: 80,
        }
    }

    fn cultist() -> EnemyData {
        EnemyData::new("cultist", "Cultist", 40, 6)
            .with_skill(EnemySkill::new("strike", "Strike", IntentType::Attack))
            .with_skill(EnemySkill::new("ritual", "Ritual", IntentType::Buff).with_cooldown(3))
            .with_skill(EnemySkill::new("guard", "Guard", IntentType::Defend).with_block(6))
            .with_pattern(
                AiPattern::new(vec![WeightedSkill::new("ritual", 1)]).when(AiCondition::FirstTurn),
            )
            .with_pattern(
                AiPattern::new(vec![WeightedSkill::new("guard", 1)])
                    .when(AiCondition::HpBelow(50)),
            )
            .with_pattern(AiPattern::new(vec![
                WeightedSkill::new("strike", 3),
                WeightedSkill::new("guard", 1),
            ]))
    }

    #[test]
    fn test_condition_holds() {
        let c = ctx(4);
        assert!(AiCondition::TurnEven.holds(&c));
        assert!(!AiCondition::TurnOdd.holds(&c));
        assert!(AiCondition::EveryNTurns(2).holds(&c));
        assert!(!AiCondition::EveryNTurns(3).holds(&c));
        assert!(AiCondition::TurnAtLeast(4).holds(&c));
        assert!(AiCondition::Turn(4).holds(&c));
        assert!(!AiCondition::FirstTurn.holds(&c));

        let hurt = AiContext {
            enemy_hp: 19,
            player_hp: 20,
            ..ctx(1)
        };
        assert!(AiCondition::HpBelow(50).holds(&hurt));
        assert!(!AiCondition::HpAbove(50).holds(&hurt));
        assert!(AiCondition::PlayerHpBelow(30).holds(&hurt));
        assert!(AiCondition::FirstTurn.holds(&hurt));
    }

    #[test]
    fn test_pattern_selection_order() {
        let data = cultist();
        assert_eq!(EnemyAi::select_pattern(&data, &ctx(1)).unwrap().0, 0);
        assert_eq!(EnemyAi::select_pattern(&data, &ctx(2)).unwrap().0, 2);

        let hurt = AiContext {
            enemy_hp: 10,
            ..ctx(1)
        };
        // Declaration order wins when several conditional patterns match.
        assert_eq!(EnemyAi::select_pattern(&data, &hurt).unwrap().0, 0);
    }

    #[test]
    fn test_no_unconditional_pattern() {
        let mut data = cultist();
        data.ai_patterns.pop();
        let err = EnemyAi::select_pattern(&data, &ctx(2)).unwrap_err();
        assert_eq!(err, BattleError::MisconfiguredAiPattern(data.id.clone()));
    }

    #[test]
    fn test_decide_is_idempotent() {
        let data = cultist();
        let enemy = EnemyInstance::new(0, "cultist", "Cultist", 40);
        let rng = GameRng::new(99);

        let first = EnemyAi::decide(&data, &enemy, &ctx(2), &mut rng.clone()).unwrap();
        let second = EnemyAi::decide(&data, &enemy, &ctx(2), &mut rng.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decide_consumes_one_draw() {
        let data = cultist();
        let enemy = EnemyInstance::new(0, "cultist", "Cultist", 40);
        let mut rng = GameRng::new(7);
        EnemyAi::decide(&data, &enemy, &ctx(2), &mut rng).unwrap();
        assert_eq!(rng.draw_index(), 1);
    }

    #[test]
    fn test_recent_skill_avoided_when_alternative_exists() {
        let data = cultist();
        let mut enemy = EnemyInstance::new(0, "cultist", "Cultist", 40);
        enemy.remember_skill(SkillId::new("strike"), 1);

        for seed in 0..20 {
            let decision = EnemyAi::decide(&data, &enemy, &ctx(2), &mut GameRng::new(seed)).unwrap();
            assert_eq!(decision.skill, SkillId::new("guard"));
            assert_eq!(decision.relaxation, Relaxation::None);
        }
    }

    #[test]
    fn test_relaxation_steps() {
        let data = cultist();
        let mut enemy = EnemyInstance::new(0, "cultist", "Cultist", 40);

        // Only skill of the first-turn pattern is on cooldown.
        enemy.set_cooldown(SkillId::new("ritual"), 2);
        let decision = EnemyAi::decide(&data, &enemy, &ctx(1), &mut GameRng::new(1)).unwrap();
        assert_eq!(decision.relaxation, Relaxation::Cooldown);

        // ... and also just used.
        enemy.remember_skill(SkillId::new("ritual"), 1);
        let decision = EnemyAi::decide(&data, &enemy, &ctx(1), &mut GameRng::new(1)).unwrap();
        assert_eq!(decision.skill, SkillId::new("ritual"));
        assert_eq!(decision.relaxation, Relaxation::Repetition);
    }

    #[test]
    fn test_zero_weights_force_first_skill() {
        let data = EnemyData::new("statue", "Statue", 30, 0)
            .with_skill(EnemySkill::new("wait", "Wait", IntentType::Special))
            .with_skill(EnemySkill::new("stare", "Stare", IntentType::Debuff))
            .with_pattern(AiPattern::new(vec![
                WeightedSkill::new("wait", 0),
                WeightedSkill::new("stare", 0),
            ]));
        let enemy = EnemyInstance::new(0, "statue", "Statue", 30);
        let mut rng = GameRng::new(3);

        let decision = EnemyAi::decide(&data, &enemy, &ctx(1), &mut rng).unwrap();
        assert_eq!(decision.skill, SkillId::new("wait"));
        assert_eq!(decision.relaxation, Relaxation::Forced);
        assert_eq!(rng.draw_index(), 0);
    }

    #[test]
    fn test_commit_sets_intent_and_cooldown() {
        let data = cultist();
        let config = GameConfig::default();
        let mut enemy = EnemyInstance::new(0, "cultist", "Cultist", 40);

        let decision = EnemyAi::decide(&data, &enemy, &ctx(1), &mut GameRng::new(5)).unwrap();
        let intent = EnemyAi::commit(&data, &mut enemy, &decision, &config).unwrap();

        assert_eq!(intent.skill, SkillId::new("ritual"));
        assert_eq!(enemy.current_intent, Some(intent));
        assert_eq!(enemy.cooldown(&SkillId::new("ritual")), 3);
        assert!(!enemy.recently_used(&SkillId::new("ritual")));
    }

    #[test]
    fn test_commit_unknown_skill() {
        let data = cultist();
        let mut enemy = EnemyInstance::new(0, "cultist", "Cultist", 40);
        let decision = IntentDecision {
            pattern: 0,
            skill: SkillId::new("meteor"),
            relaxation: Relaxation::None,
        };
        assert!(matches!(
            EnemyAi::commit(&data, &mut enemy, &decision, &GameConfig::default()),
            Err(BattleError::UnknownSkillReference { .. })
        ));
        assert!(enemy.current_intent.is_none());
    }
}
