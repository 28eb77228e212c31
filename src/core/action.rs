//! Player actions.
//!
//! The player has two verbs during a battle: play a card from hand
//! (optionally aimed at an enemy) and end the turn. Everything else is
//! driven by the engine.

use serde::{Deserialize, Serialize};

use super::entity::{CombatantId, InstanceId};

/// A player decision.
///
/// ## Example
///
/// ```
/// use synth_battle::core::{Action, CombatantId, InstanceId};
///
/// let strike = Action::play(InstanceId::new(3), Some(CombatantId::Enemy(0)));
/// assert_eq!(strike.card(), Some(InstanceId::new(3)));
/// assert_eq!(Action::EndTurn.card(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play a card from hand.
    PlayCard {
        instance: InstanceId,
        /// Required when any effect targets a single chosen enemy.
        target: Option<CombatantId>,
    },
    /// End the player's turn.
    EndTurn,
}

impl Action {
    #[must_use]
    pub fn play(instance: InstanceId, target: Option<CombatantId>) -> Self {
        Action::PlayCard { instance, target }
    }

    /// The card this action plays, if any.
    #[must_use]
    pub fn card(&self) -> Option<InstanceId> {
        match self {
            Action::PlayCard { instance, .. } => Some(*instance),
            Action::EndTurn => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::PlayCard {
                instance,
                target: Some(target),
            } => write!(f, "Play {} -> {}", instance, target),
            Action::PlayCard { instance, target: None } => write!(f, "Play {}", instance),
            Action::EndTurn => write!(f, "End turn"),
        }
    }
}

/// An accepted action with its position in the battle.
///
/// Replaying the records in order against a battle with the same seed
/// reproduces it exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Index among all accepted actions of the battle.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            action,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let action = Action::play(InstanceId::new(5), Some(CombatantId::Enemy(1)));
        assert_eq!(action.to_string(), "Play Instance(5) -> Enemy(1)");
        assert_eq!(Action::play(InstanceId::new(2), None).to_string(), "Play Instance(2)");
        assert_eq!(Action::EndTurn.to_string(), "End turn");
    }

    #[test]
    fn test_action_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |a: &Action| {
            let mut h = DefaultHasher::new();
            a.hash(&mut h);
            h.finish()
        };

        let a1 = Action::play(InstanceId::new(1), None);
        let a2 = Action::play(InstanceId::new(1), None);
        let a3 = Action::play(InstanceId::new(1), Some(CombatantId::Enemy(0)));

        assert_eq!(hash(&a1), hash(&a2));
        assert_ne!(hash(&a1), hash(&a3));
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord::new(Action::play(InstanceId::new(4), None), 2, 3);

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
