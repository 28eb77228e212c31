//! Enemy definitions - static enemy data.
//!
//! An `EnemyData` lists the enemy's skills and the AI patterns that choose
//! between them. Skills compile to the same `CardEffect` lists cards use,
//! so enemy turns go through the common effect resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{BattleError, BattleResult, EnemyId, GameConfig, SkillId};
use crate::effects::{parse_percent, CardEffect, TargetSelector};

/// Enemy tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnemyType {
    #[default]
    Normal,
    Elite,
    Boss,
}

/// Broad behavior profile (content metadata).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Behavior {
    Aggressive,
    Defensive,
    #[default]
    Balanced,
    Special,
}

/// What an announced intent looks like to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentType {
    Attack,
    HeavyAttack,
    Defend,
    Buff,
    Debuff,
    Special,
}

impl IntentType {
    /// Attack intents fall back to the enemy's base damage.
    #[must_use]
    pub fn is_attack(self) -> bool {
        matches!(self, IntentType::Attack | IntentType::HeavyAttack)
    }
}

/// Extra effect attached to a skill.
///
/// Harmful kinds land on the player; `BUFF` and `HEAL` land on the enemy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillEffect {
    Dot {
        value: i32,
        #[serde(default)]
        turns: Option<i32>,
    },
    Debuff {
        value: i32,
        #[serde(default)]
        turns: Option<i32>,
    },
    Slow {
        value: i32,
        #[serde(default)]
        turns: Option<i32>,
    },
    Buff {
        value: i32,
        #[serde(default)]
        turns: Option<i32>,
    },
    Heal {
        value: i32,
    },
}

impl SkillEffect {
    /// The equivalent card effect.
    #[must_use]
    pub fn to_card_effect(&self) -> CardEffect {
        match *self {
            SkillEffect::Dot { value, turns } => CardEffect::dot(value, turns),
            SkillEffect::Debuff { value, turns } => CardEffect::debuff(value, turns),
            SkillEffect::Slow { value, turns } => CardEffect::slow(value, turns),
            SkillEffect::Buff { value, turns } => CardEffect::buff_damage(value, turns),
            SkillEffect::Heal { value } => CardEffect::heal(value),
        }
    }
}

fn default_hits() -> u32 {
    1
}

/// Most hits a single skill may make.
pub const MAX_SKILL_HITS: u32 = 32;

/// One enemy skill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySkill {
    pub id: SkillId,
    pub name: String,
    pub intent: IntentType,
    /// Damage per hit. Attack intents without it use the enemy's base damage.
    #[serde(default)]
    pub damage: Option<i32>,
    #[serde(default)]
    pub block: Option<i32>,
    #[serde(default = "default_hits")]
    pub hits: u32,
    #[serde(default)]
    pub effects: Vec<SkillEffect>,
    /// Damage ignores block.
    #[serde(default)]
    pub piercing: bool,
    /// Minimum number of turns between two uses.
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub description: String,
}

impl EnemySkill {
    pub fn new(id: impl Into<SkillId>, name: impl Into<String>, intent: IntentType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            intent,
            damage: None,
            block: None,
            hits: 1,
            effects: Vec::new(),
            piercing: false,
            cooldown: 0,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = Some(damage);
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: i32) -> Self {
        self.block = Some(block);
        self
    }

    #[must_use]
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn piercing(mut self) -> Self {
        self.piercing = true;
        self
    }

    /// Unscaled damage per hit.
    #[must_use]
    pub fn base_damage(&self, enemy_damage: i32) -> Option<i32> {
        self.damage
            .or_else(|| self.intent.is_attack().then_some(enemy_damage))
    }

    /// Damage per hit after the difficulty multiplier.
    #[must_use]
    pub fn scaled_damage(&self, enemy_damage: i32, config: &GameConfig) -> Option<i32> {
        self.base_damage(enemy_damage)
            .map(|d| config.scale_enemy_damage(d))
    }

    /// Compile to the effect list the resolver runs: one DAMAGE per hit,
    /// then BLOCK, then extra effects.
    #[must_use]
    pub fn to_effects(&self, enemy_damage: i32, config: &GameConfig) -> Vec<CardEffect> {
        let mut effects = Vec::new();

        if let Some(damage) = self.scaled_damage(enemy_damage, config) {
            let hit = if self.piercing {
                CardEffect::piercing_damage(damage)
            } else {
                CardEffect::damage(damage)
            };
            effects.extend((0..self.hits).map(|_| hit.clone()));
        }

        if let Some(block) = self.block {
            effects.push(CardEffect::block(block).targeting(TargetSelector::SelfTarget));
        }

        effects.extend(self.effects.iter().map(SkillEffect::to_card_effect));
        effects
    }
}

/// A skill choice inside an AI pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedSkill {
    pub skill_id: SkillId,
    /// Relative weight; 0 never wins a draw.
    pub weight: u32,
}

impl WeightedSkill {
    pub fn new(skill_id: impl Into<SkillId>, weight: u32) -> Self {
        Self {
            skill_id: skill_id.into(),
            weight,
        }
    }
}

/// Condition on an AI pattern.
///
/// Parsed from content strings: `hp_below_<n>%`, `hp_above_<n>%`,
/// `player_hp_below_<n>%`, `turn_<n>`, `turn_at_least_<n>`, `turn_even`,
/// `turn_odd`, `every_<n>_turns`, `first_turn`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AiCondition {
    HpBelow(u32),
    HpAbove(u32),
    PlayerHpBelow(u32),
    Turn(u32),
    TurnAtLeast(u32),
    TurnEven,
    TurnOdd,
    EveryNTurns(u32),
    FirstTurn,
}

impl FromStr for AiCondition {
    type Err = BattleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parsed = match text {
            "turn_even" => Some(AiCondition::TurnEven),
            "turn_odd" => Some(AiCondition::TurnOdd),
            "first_turn" => Some(AiCondition::FirstTurn),
            _ => parse_percent(text, "player_hp_below_")
                .map(AiCondition::PlayerHpBelow)
                .or_else(|| parse_percent(text, "hp_below_").map(AiCondition::HpBelow))
                .or_else(|| parse_percent(text, "hp_above_").map(AiCondition::HpAbove))
                .or_else(|| {
                    text.strip_prefix("turn_at_least_")
                        .and_then(|n| n.parse().ok())
                        .map(AiCondition::TurnAtLeast)
                })
                .or_else(|| {
                    text.strip_prefix("every_")
                        .and_then(|rest| rest.strip_suffix("_turns"))
                        .and_then(|n| n.parse().ok())
                        .filter(|&n| n > 0)
                        .map(AiCondition::EveryNTurns)
                })
                .or_else(|| {
                    text.strip_prefix("turn_")
                        .and_then(|n| n.parse().ok())
                        .map(AiCondition::Turn)
                }),
        };

        parsed.ok_or_else(|| BattleError::InvalidContent(format!("unknown AI condition '{}'", text)))
    }
}

impl TryFrom<String> for AiCondition {
    type Error = BattleError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl fmt::Display for AiCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiCondition::HpBelow(n) => write!(f, "hp_below_{}%", n),
            AiCondition::HpAbove(n) => write!(f, "hp_above_{}%", n),
            AiCondition::PlayerHpBelow(n) => write!(f, "player_hp_below_{}%", n),
            AiCondition::Turn(n) => write!(f, "turn_{}", n),
            AiCondition::TurnAtLeast(n) => write!(f, "turn_at_least_{}", n),
            AiCondition::TurnEven => write!(f, "turn_even"),
            AiCondition::TurnOdd => write!(f, "turn_odd"),
            AiCondition::EveryNTurns(n) => write!(f, "every_{}_turns", n),
            AiCondition::FirstTurn => write!(f, "first_turn"),
        }
    }
}

impl From<AiCondition> for String {
    fn from(condition: AiCondition) -> Self {
        condition.to_string()
    }
}

/// A weighted skill list, active when all its conditions hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiPattern {
    /// Empty means unconditional.
    #[serde(default)]
    pub conditions: Vec<AiCondition>,
    pub skills: Vec<WeightedSkill>,
}

impl AiPattern {
    /// An unconditional pattern.
    #[must_use]
    pub fn new(skills: Vec<WeightedSkill>) -> Self {
        Self {
            conditions: Vec::new(),
            skills,
        }
    }

    #[must_use]
    pub fn when(mut self, condition: AiCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Reward descriptor, carried for the reward system; not interpreted here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyRewards {
    /// Gold range `[min, max]`.
    #[serde(default)]
    pub gold: (u32, u32),
    #[serde(default)]
    pub card_rewards: Option<u32>,
    #[serde(default)]
    pub relic_chance: Option<f32>,
}

fn default_act() -> u32 {
    1
}

/// Static enemy definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyData {
    pub id: EnemyId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub enemy_type: EnemyType,
    #[serde(default)]
    pub behavior: Behavior,

    pub hp: i32,
    /// Base damage for attack skills that don't set their own.
    pub damage: i32,
    /// Block gained at the start of each of this enemy's turns.
    #[serde(default)]
    pub block: Option<i32>,
    /// Keep all block across turn boundaries.
    #[serde(default)]
    pub retains_block: bool,

    pub skills: Vec<EnemySkill>,
    pub ai_patterns: Vec<AiPattern>,

    #[serde(default)]
    pub rewards: EnemyRewards,
    #[serde(default = "default_act")]
    pub act: u32,
    #[serde(default)]
    pub description: String,
}

impl EnemyData {
    pub fn new(id: impl Into<EnemyId>, name: impl Into<String>, hp: i32, damage: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enemy_type: EnemyType::Normal,
            behavior: Behavior::Balanced,
            hp,
            damage,
            block: None,
            retains_block: false,
            skills: Vec::new(),
            ai_patterns: Vec::new(),
            rewards: EnemyRewards::default(),
            act: 1,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_skill(mut self, skill: EnemySkill) -> Self {
        self.skills.push(skill);
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: AiPattern) -> Self {
        self.ai_patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn with_base_block(mut self, block: i32) -> Self {
        self.block = Some(block);
        self
    }

    #[must_use]
    pub fn with_type(mut self, enemy_type: EnemyType) -> Self {
        self.enemy_type = enemy_type;
        self
    }

    #[must_use]
    pub fn retaining_block(mut self) -> Self {
        self.retains_block = true;
        self
    }

    /// Find a skill by id.
    #[must_use]
    pub fn skill(&self, id: &SkillId) -> Option<&EnemySkill> {
        self.skills.iter().find(|s| &s.id == id)
    }

    /// Find a skill, failing with `UnknownSkillReference`.
    pub fn lookup_skill(&self, id: &SkillId) -> BattleResult<&EnemySkill> {
        self.skill(id).ok_or_else(|| BattleError::UnknownSkillReference {
            enemy: self.id.clone(),
            skill: id.clone(),
        })
    }

    /// Check the AI data is usable: every pattern references known skills
    /// and has at least one entry, and an unconditional fallback exists.
    /// Skill hit counts are bounded by `MAX_SKILL_HITS`.
    pub fn validate(&self) -> BattleResult<()> {
        for (i, skill) in self.skills.iter().enumerate() {
            if self.skills[..i].iter().any(|s| s.id == skill.id) {
                return Err(BattleError::InvalidContent(format!(
                    "{} defines {} twice",
                    self.id, skill.id
                )));
            }
            if skill.hits > MAX_SKILL_HITS {
                return Err(BattleError::InvalidContent(format!(
                    "{} skill {} has {} hits (max {})",
                    self.id, skill.id, skill.hits, MAX_SKILL_HITS
                )));
            }
        }

        for pattern in &self.ai_patterns {
            if pattern.skills.is_empty() {
                return Err(BattleError::MisconfiguredAiPattern(self.id.clone()));
            }
            for entry in &pattern.skills {
                self.lookup_skill(&entry.skill_id)?;
            }
        }

        if !self.ai_patterns.iter().any(AiPattern::is_unconditional) {
            return Err(BattleError::MisconfiguredAiPattern(self.id.clone()));
        }
        Ok(())
    }
}
