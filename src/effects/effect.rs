//! Card effect definitions.
//!
//! Effects are the building blocks of cards and enemy skills. Each kind
//! carries only its own payload; selector and condition are optional and
//! shared by all kinds.
//!
//! ## Content format
//!
//! ```json
//! { "type": "DAMAGE", "value": 8, "piercing": true, "target": "ALL_ENEMIES" }
//! { "type": "DOT", "value": 3, "turns": 2, "condition": "target_has_block" }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::targeting::TargetSelector;
use crate::core::{BattleError, StatusId};
use crate::status::{StatusEffect, StatusKind};

/// Default status duration when an effect omits `turns`: it lasts until
/// the owner's next tick point.
pub const DEFAULT_STATUS_TURNS: i32 = 1;

/// What an effect does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    /// Deal damage. Block absorbs it unless `piercing`.
    Damage {
        value: i32,
        #[serde(default)]
        piercing: bool,
    },
    /// Gain block.
    Block { value: i32 },
    /// Restore HP, capped at max HP.
    Heal { value: i32 },
    /// Draw cards (player only).
    Draw { value: i32 },
    /// Gain or lose energy (player only).
    Energy { value: i32 },
    /// Apply `DamageUp`.
    BuffDamage {
        value: i32,
        #[serde(default)]
        turns: Option<i32>,
    },
    /// Apply `Weak`.
    Debuff {
        value: i32,
        #[serde(default)]
        turns: Option<i32>,
    },
    /// Apply `Slow`.
    Slow {
        value: i32,
        #[serde(default)]
        turns: Option<i32>,
    },
    /// Apply `Dot`.
    Dot {
        value: i32,
        #[serde(default)]
        turns: Option<i32>,
    },
}

impl EffectKind {
    /// The primary magnitude.
    #[must_use]
    pub fn value(&self) -> i32 {
        match self {
            EffectKind::Damage { value, .. }
            | EffectKind::Block { value }
            | EffectKind::Heal { value }
            | EffectKind::Draw { value }
            | EffectKind::Energy { value }
            | EffectKind::BuffDamage { value, .. }
            | EffectKind::Debuff { value, .. }
            | EffectKind::Slow { value, .. }
            | EffectKind::Dot { value, .. } => *value,
        }
    }

    /// Short name for log entries.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Damage { .. } => "damage",
            EffectKind::Block { .. } => "block",
            EffectKind::Heal { .. } => "heal",
            EffectKind::Draw { .. } => "draw",
            EffectKind::Energy { .. } => "energy",
            EffectKind::BuffDamage { .. } => "buff_damage",
            EffectKind::Debuff { .. } => "debuff",
            EffectKind::Slow { .. } => "slow",
            EffectKind::Dot { .. } => "dot",
        }
    }

    /// The status this effect applies, if it is a status effect.
    #[must_use]
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self {
            EffectKind::BuffDamage { .. } => Some(StatusKind::DamageUp),
            EffectKind::Debuff { .. } => Some(StatusKind::Weak),
            EffectKind::Slow { .. } => Some(StatusKind::Slow),
            EffectKind::Dot { .. } => Some(StatusKind::Dot),
            _ => None,
        }
    }

    /// Build the status this effect applies (`value` → magnitude,
    /// `turns` → duration).
    #[must_use]
    pub fn to_status(&self) -> Option<StatusEffect> {
        let turns = match self {
            EffectKind::BuffDamage { turns, .. }
            | EffectKind::Debuff { turns, .. }
            | EffectKind::Slow { turns, .. }
            | EffectKind::Dot { turns, .. } => *turns,
            _ => return None,
        };
        let kind = self.status_kind()?;
        Some(StatusEffect::new(
            kind,
            self.value(),
            turns.unwrap_or(DEFAULT_STATUS_TURNS),
        ))
    }

    /// Selector used when the effect does not name one.
    #[must_use]
    pub fn default_selector(&self) -> TargetSelector {
        match self {
            EffectKind::Damage { .. }
            | EffectKind::Debuff { .. }
            | EffectKind::Slow { .. }
            | EffectKind::Dot { .. } => TargetSelector::Enemy,
            EffectKind::Block { .. }
            | EffectKind::Heal { .. }
            | EffectKind::Draw { .. }
            | EffectKind::Energy { .. }
            | EffectKind::BuffDamage { .. } => TargetSelector::SelfTarget,
        }
    }
}

/// An atomic effect with optional selector and trigger condition.
///
/// ## Example
///
/// ```
/// use synth_battle::effects::{CardEffect, EffectCondition, TargetSelector};
///
/// let finisher = CardEffect::damage(10)
///     .targeting(TargetSelector::AllEnemies)
///     .when(EffectCondition::TargetHpBelow(50));
///
/// assert_eq!(finisher.selector(), TargetSelector::AllEnemies);
/// assert_eq!(CardEffect::block(5).selector(), TargetSelector::SelfTarget);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEffect {
    #[serde(flatten)]
    pub kind: EffectKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<EffectCondition>,
}

impl CardEffect {
    #[must_use]
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            target: None,
            condition: None,
        }
    }

    #[must_use]
    pub fn damage(value: i32) -> Self {
        Self::new(EffectKind::Damage {
            value,
            piercing: false,
        })
    }

    #[must_use]
    pub fn piercing_damage(value: i32) -> Self {
        Self::new(EffectKind::Damage {
            value,
            piercing: true,
        })
    }

    #[must_use]
    pub fn block(value: i32) -> Self {
        Self::new(EffectKind::Block { value })
    }

    #[must_use]
    pub fn heal(value: i32) -> Self {
        Self::new(EffectKind::Heal { value })
    }

    #[must_use]
    pub fn draw(value: i32) -> Self {
        Self::new(EffectKind::Draw { value })
    }

    #[must_use]
    pub fn energy(value: i32) -> Self {
        Self::new(EffectKind::Energy { value })
    }

    #[must_use]
    pub fn buff_damage(value: i32, turns: Option<i32>) -> Self {
        Self::new(EffectKind::BuffDamage { value, turns })
    }

    #[must_use]
    pub fn debuff(value: i32, turns: Option<i32>) -> Self {
        Self::new(EffectKind::Debuff { value, turns })
    }

    #[must_use]
    pub fn slow(value: i32, turns: Option<i32>) -> Self {
        Self::new(EffectKind::Slow { value, turns })
    }

    #[must_use]
    pub fn dot(value: i32, turns: Option<i32>) -> Self {
        Self::new(EffectKind::Dot { value, turns })
    }

    /// Set an explicit target selector.
    #[must_use]
    pub fn targeting(mut self, selector: TargetSelector) -> Self {
        self.target = Some(selector);
        self
    }

    /// Only resolve against targets for which `condition` holds.
    #[must_use]
    pub fn when(mut self, condition: EffectCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Explicit selector, or the kind's default.
    #[must_use]
    pub fn selector(&self) -> TargetSelector {
        self.target.unwrap_or_else(|| self.kind.default_selector())
    }
}

/// Trigger condition on an effect, evaluated per target.
///
/// Parsed from content strings:
/// `target_has_block`, `target_has_status:<id>`, `target_hp_below_<n>%`,
/// `self_hp_below_<n>%`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EffectCondition {
    TargetHasBlock,
    TargetHasStatus(StatusId),
    TargetHpBelow(u32),
    SelfHpBelow(u32),
}

/// Parse `<prefix><n>%` into `n`.
pub(crate) fn parse_percent(text: &str, prefix: &str) -> Option<u32> {
    text.strip_prefix(prefix)?.strip_suffix('%')?.parse().ok()
}

impl FromStr for EffectCondition {
    type Err = BattleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text == "target_has_block" {
            return Ok(EffectCondition::TargetHasBlock);
        }
        if let Some(id) = text.strip_prefix("target_has_status:") {
            if !id.is_empty() {
                return Ok(EffectCondition::TargetHasStatus(StatusId::new(id)));
            }
        }
        if let Some(n) = parse_percent(text, "target_hp_below_") {
            return Ok(EffectCondition::TargetHpBelow(n));
        }
        if let Some(n) = parse_percent(text, "self_hp_below_") {
            return Ok(EffectCondition::SelfHpBelow(n));
        }
        Err(BattleError::InvalidContent(format!(
            "unknown effect condition '{}'",
            text
        )))
    }
}

impl TryFrom<String> for EffectCondition {
    type Error = BattleError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl fmt::Display for EffectCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectCondition::TargetHasBlock => write!(f, "target_has_block"),
            EffectCondition::TargetHasStatus(id) => write!(f, "target_has_status:{}", id.as_str()),
            EffectCondition::TargetHpBelow(n) => write!(f, "target_hp_below_{}%", n),
            EffectCondition::SelfHpBelow(n) => write!(f, "self_hp_below_{}%", n),
        }
    }
}

impl From<EffectCondition> for String {
    fn from(condition: EffectCondition) -> Self {
        condition.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors() {
        assert_eq!(CardEffect::damage(1).selector(), TargetSelector::Enemy);
        assert_eq!(CardEffect::dot(1, None).selector(), TargetSelector::Enemy);
        assert_eq!(CardEffect::slow(1, None).selector(), TargetSelector::Enemy);
        assert_eq!(CardEffect::debuff(1, None).selector(), TargetSelector::Enemy);
        assert_eq!(CardEffect::heal(1).selector(), TargetSelector::SelfTarget);
        assert_eq!(CardEffect::energy(1).selector(), TargetSelector::SelfTarget);
        assert_eq!(CardEffect::buff_damage(1, None).selector(), TargetSelector::SelfTarget);
        assert_eq!(
            CardEffect::block(1).targeting(TargetSelector::Enemy).selector(),
            TargetSelector::Enemy
        );
    }

    #[test]
    fn test_to_status() {
        let status = EffectKind::Dot {
            value: 3,
            turns: Some(2),
        }
        .to_status()
        .unwrap();
        assert_eq!(status.kind, StatusKind::Dot);
        assert_eq!(status.magnitude, 3);
        assert_eq!(status.duration, 2);

        let weak = EffectKind::Debuff { value: 1, turns: None }.to_status().unwrap();
        assert_eq!(weak.duration, DEFAULT_STATUS_TURNS);

        assert!(EffectKind::Block { value: 5 }.to_status().is_none());
    }

    #[test]
    fn test_condition_parse() {
        assert_eq!(
            "target_has_block".parse::<EffectCondition>().unwrap(),
            EffectCondition::TargetHasBlock
        );
        assert_eq!(
            "target_has_status:dot".parse::<EffectCondition>().unwrap(),
            EffectCondition::TargetHasStatus(StatusId::new("dot"))
        );
        assert_eq!(
            "target_hp_below_50%".parse::<EffectCondition>().unwrap(),
            EffectCondition::TargetHpBelow(50)
        );
        assert_eq!(
            "self_hp_below_30%".parse::<EffectCondition>().unwrap(),
            EffectCondition::SelfHpBelow(30)
        );
        assert!("target_hp_below_x%".parse::<EffectCondition>().is_err());
        assert!("target_has_status:".parse::<EffectCondition>().is_err());
        assert!("always".parse::<EffectCondition>().is_err());
    }

    #[test]
    fn test_condition_display_round_trips() {
        let condition = EffectCondition::TargetHasStatus(StatusId::new("weak"));
        assert_eq!(condition.to_string().parse::<EffectCondition>().unwrap(), condition);
    }

    #[test]
    fn test_effect_json() {
        let effect: CardEffect = serde_json::from_str(
            r#"{ "type": "DAMAGE", "value": 8, "piercing": true, "target": "RANDOM_ENEMY",
                 "condition": "target_hp_below_25%" }"#,
        )
        .unwrap();

        assert_eq!(
            effect.kind,
            EffectKind::Damage {
                value: 8,
                piercing: true
            }
        );
        assert_eq!(effect.target, Some(TargetSelector::RandomEnemy));
        assert_eq!(effect.condition, Some(EffectCondition::TargetHpBelow(25)));

        let json = serde_json::to_value(&CardEffect::block(5)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "BLOCK", "value": 5 }));
    }
}
