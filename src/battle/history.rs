//! Battle results.

use serde::{Deserialize, Serialize};

use crate::core::{BattleState, CardId, EncounterId};

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleOutcome {
    /// Every enemy reached 0 HP.
    Victory,
    /// The player reached 0 HP.
    Defeat,
    /// The turn counter passed the encounter's limit.
    TurnLimit,
    /// The caller gave up mid-battle.
    Abandoned,
}

impl BattleOutcome {
    /// Only a victory counts as won.
    #[must_use]
    pub fn is_victory(self) -> bool {
        self == BattleOutcome::Victory
    }
}

/// Summary of a finished battle, handed back to the run layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleHistory {
    pub encounter_id: EncounterId,
    pub victory: bool,
    pub outcome: BattleOutcome,
    /// Turns started, including the one the battle ended in.
    pub turns: u32,
    pub damage_dealt: i32,
    pub damage_taken: i32,
    /// Card ids in play order.
    pub cards_played: Vec<CardId>,
    pub final_hp: i32,
}

impl BattleHistory {
    /// Archive a state that has just reached its outcome.
    #[must_use]
    pub fn archive(state: &BattleState, outcome: BattleOutcome) -> Self {
        Self {
            encounter_id: state.encounter.encounter_id.clone(),
            victory: outcome.is_victory(),
            outcome,
            turns: state.turn,
            damage_dealt: state.stats.damage_dealt,
            damage_taken: state.stats.damage_taken,
            cards_played: state.stats.cards_played.iter().cloned().collect(),
            final_hp: state.player.current_hp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{battle_state, enemy};

    #[test]
    fn test_outcome_is_victory() {
        assert!(BattleOutcome::Victory.is_victory());
        assert!(!BattleOutcome::Defeat.is_victory());
        assert!(!BattleOutcome::TurnLimit.is_victory());
        assert!(!BattleOutcome::Abandoned.is_victory());
    }

    #[test]
    fn test_archive() {
        let mut state = battle_state(vec![enemy("slime", 10)]);
        state.turn = 3;
        state.stats.damage_dealt = 12;
        state.stats.damage_taken = 4;
        state.stats.cards_played.push_back(CardId::new("strike"));
        state.player.current_hp = 76;

        let history = BattleHistory::archive(&state, BattleOutcome::TurnLimit);
        assert!(!history.victory);
        assert_eq!(history.turns, 3);
        assert_eq!(history.damage_dealt, 12);
        assert_eq!(history.cards_played, vec![CardId::new("strike")]);
        assert_eq!(history.final_hp, 76);
    }
}
