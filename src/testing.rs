//! Fixtures for unit tests.

use im::Vector;

use crate::core::{
    BattleLog, BattlePhase, BattleState, BattleStats, EncounterId, EncounterInstance, PlayerState,
};
use crate::deck::DeckPiles;
use crate::enemies::EnemyInstance;
use crate::status::StatusList;

/// A bare enemy with full HP.
pub fn enemy(id: &str, hp: i32) -> EnemyInstance {
    EnemyInstance::new(0, id, id, hp)
}

/// A state in the player's first turn: 80/80 HP, 3/3 energy, empty piles.
/// Enemies are re-slotted in list order.
pub fn battle_state(enemies: Vec<EnemyInstance>) -> BattleState {
    let enemies: Vector<_> = enemies
        .into_iter()
        .enumerate()
        .map(|(slot, enemy)| EnemyInstance { slot, ..enemy })
        .collect();

    BattleState {
        phase: BattlePhase::PlayerTurn,
        turn: 1,
        player: PlayerState {
            current_hp: 80,
            max_hp: 80,
            energy: 3,
            max_energy: 3,
            piles: DeckPiles::default(),
            statuses: StatusList::new(),
        },
        block: 0,
        encounter: EncounterInstance {
            encounter_id: EncounterId::new("test"),
            enemies,
            turn_limit: None,
            is_completed: false,
            victory: None,
        },
        stats: BattleStats::default(),
        action_history: Vector::new(),
        log: BattleLog::new(),
        history: None,
    }
}
