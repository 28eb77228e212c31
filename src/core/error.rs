//! Battle error types.
//!
//! Two families of errors exist:
//!
//! - **Action errors** (`InvalidPhase`, `CardNotInHand`, `InsufficientEnergy`,
//!   `InvalidTarget`, `NoValidTarget`): the caller asked for something the
//!   rules forbid. The battle is left exactly as it was, so the caller can
//!   retry with corrected input.
//! - **Content errors** (`UnknownCard`, `UnknownEnemy`,
//!   `UnknownSkillReference`, `MisconfiguredAiPattern`, `InvalidContent`,
//!   `InvalidConfig`): the data handed to the engine is corrupt. These are
//!   surfaced as-is and never recovered from silently.

use std::fmt;

use super::config::ConfigField;
use super::entity::{CardId, CombatantId, EnemyId, InstanceId, SkillId};
use super::state::BattlePhase;

/// Result alias used throughout the engine.
pub type BattleResult<T> = Result<T, BattleError>;

/// Main error type for the battle engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// Action attempted in a phase that forbids it.
    InvalidPhase {
        expected: BattlePhase,
        actual: BattlePhase,
    },
    /// The card instance is not in the player's hand.
    CardNotInHand(InstanceId),
    /// The card costs more energy than the player has.
    InsufficientEnergy { required: i32, available: i32 },
    /// Missing or illegal target for the effect's selector.
    InvalidTarget(Option<CombatantId>),
    /// A random or all-enemies selector found no living target.
    NoValidTarget,
    /// A card instance references a card that is not in the catalog.
    UnknownCard(CardId),
    /// An encounter references an enemy that is not in the catalog.
    UnknownEnemy(EnemyId),
    /// An AI pattern or intent references a skill the enemy does not have.
    UnknownSkillReference { enemy: EnemyId, skill: SkillId },
    /// The enemy has no unconditional AI pattern to fall back on.
    MisconfiguredAiPattern(EnemyId),
    /// Content data is malformed (e.g. an unparseable condition string).
    InvalidContent(String),
    /// Configuration value out of range.
    InvalidConfig(ConfigField),
}

impl BattleError {
    /// Check if this error indicates corrupt content or configuration
    /// rather than a rejected player action.
    #[must_use]
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            BattleError::UnknownCard(_)
                | BattleError::UnknownEnemy(_)
                | BattleError::UnknownSkillReference { .. }
                | BattleError::MisconfiguredAiPattern(_)
                | BattleError::InvalidContent(_)
                | BattleError::InvalidConfig(_)
        )
    }
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::InvalidPhase { expected, actual } => {
                write!(f, "Invalid phase: expected {:?}, battle is in {:?}", expected, actual)
            }
            BattleError::CardNotInHand(id) => write!(f, "{} is not in hand", id),
            BattleError::InsufficientEnergy { required, available } => write!(
                f,
                "Insufficient energy: card costs {}, player has {}",
                required, available
            ),
            BattleError::InvalidTarget(Some(target)) => write!(f, "Invalid target: {}", target),
            BattleError::InvalidTarget(None) => write!(f, "Missing target"),
            BattleError::NoValidTarget => write!(f, "No living target available"),
            BattleError::UnknownCard(id) => write!(f, "Unknown card: {}", id),
            BattleError::UnknownEnemy(id) => write!(f, "Unknown enemy: {}", id),
            BattleError::UnknownSkillReference { enemy, skill } => {
                write!(f, "{} references unknown {}", enemy, skill)
            }
            BattleError::MisconfiguredAiPattern(enemy) => {
                write!(f, "{} has no unconditional AI pattern", enemy)
            }
            BattleError::InvalidContent(details) => write!(f, "Invalid content: {}", details),
            BattleError::InvalidConfig(field) => write!(f, "Invalid config value: {:?}", field),
        }
    }
}

impl std::error::Error for BattleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = BattleError::InsufficientEnergy {
            required: 2,
            available: 1,
        };
        assert_eq!(err.to_string(), "Insufficient energy: card costs 2, player has 1");

        let err = BattleError::CardNotInHand(InstanceId::new(4));
        assert_eq!(err.to_string(), "Instance(4) is not in hand");

        let err = BattleError::MisconfiguredAiPattern(EnemyId::new("slime"));
        assert_eq!(err.to_string(), "Enemy(slime) has no unconditional AI pattern");
    }

    #[test]
    fn test_content_error_classification() {
        assert!(BattleError::UnknownCard(CardId::new("x")).is_content_error());
        assert!(BattleError::InvalidConfig(ConfigField::HandSize).is_content_error());
        assert!(!BattleError::NoValidTarget.is_content_error());
        assert!(!BattleError::InvalidTarget(None).is_content_error());
    }
}
