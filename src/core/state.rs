//! Battle state: everything a battle mutates.
//!
//! ## BattleState
//!
//! - Phase and turn counter
//! - Player (HP, energy, piles, statuses) and the player's block
//! - Encounter instance (enemies, completion flags)
//! - Stats, accepted action history, and the battle log
//!
//! Every collection is an `im` persistent structure, so cloning the whole
//! state is O(1). The battle engine takes a clone before each action and
//! restores it if the action is rejected.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::combatant::{CombatantMut, CombatantRef};
use super::entity::{CardId, CombatantId, EncounterId};
use super::log::{BattleLog, LogEvent};
use crate::battle::{BattleHistory, BattleOutcome};
use crate::deck::DeckPiles;
use crate::enemies::EnemyInstance;
use crate::status::StatusList;

/// Battle phases.
///
/// `Start → PlayerTurn → PlayerEnd → EnemyTurn → EnemyEnd → PlayerTurn ...`
/// until a terminal condition forces `End`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattlePhase {
    Start,
    PlayerTurn,
    PlayerEnd,
    EnemyTurn,
    EnemyEnd,
    End,
}

/// Battle-scoped player state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub current_hp: i32,
    pub max_hp: i32,
    /// Within `[0, max_energy]`.
    pub energy: i32,
    pub max_energy: i32,
    /// Hand, draw, discard and exhaust piles.
    pub piles: DeckPiles,
    pub statuses: StatusList,
}

impl PlayerState {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Set energy, clamped to `[0, max_energy]`.
    pub fn set_energy(&mut self, energy: i32) -> i32 {
        self.energy = energy.clamp(0, self.max_energy);
        self.energy
    }
}

/// Running totals for the battle summary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    /// HP lost by enemies to the player's cards and statuses.
    pub damage_dealt: i32,
    /// HP lost by the player.
    pub damage_taken: i32,
    /// Card ids in play order.
    pub cards_played: Vector<CardId>,
}

/// The live enemies of one fight plus completion flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterInstance {
    pub encounter_id: EncounterId,
    /// Enemies keep their slot for the whole battle, dead or alive.
    pub enemies: Vector<EnemyInstance>,
    pub turn_limit: Option<u32>,
    /// Set once, on the transition to `End`.
    pub is_completed: bool,
    /// `None` until the battle ends.
    pub victory: Option<bool>,
}

impl EncounterInstance {
    /// Slots of enemies still alive, in list order.
    pub fn living_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_alive())
            .map(|(slot, _)| slot)
    }

    #[must_use]
    pub fn all_defeated(&self) -> bool {
        self.enemies.iter().all(|e| !e.is_alive())
    }
}

/// Complete battle state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub phase: BattlePhase,

    /// Turn number (starts at 1).
    pub turn: u32,

    pub player: PlayerState,

    /// The player's block. Clears at the start of the player's turn.
    pub block: i32,

    pub encounter: EncounterInstance,

    pub stats: BattleStats,

    /// Accepted player actions, for replay.
    pub action_history: Vector<ActionRecord>,

    /// Append-only log of everything that resolved.
    pub log: BattleLog,

    /// Set when the battle reaches `End`.
    pub history: Option<BattleHistory>,
}

impl BattleState {
    /// Get the enemy at a slot.
    #[must_use]
    pub fn enemy(&self, slot: usize) -> Option<&EnemyInstance> {
        self.encounter.enemies.get(slot)
    }

    /// Get the enemy at a slot mutably.
    pub fn enemy_mut(&mut self, slot: usize) -> Option<&mut EnemyInstance> {
        self.encounter.enemies.get_mut(slot)
    }

    /// Read-only view of a combatant.
    #[must_use]
    pub fn combatant(&self, id: CombatantId) -> Option<CombatantRef<'_>> {
        match id {
            CombatantId::Player => Some(CombatantRef {
                current_hp: self.player.current_hp,
                max_hp: self.player.max_hp,
                block: self.block,
                statuses: &self.player.statuses,
            }),
            CombatantId::Enemy(slot) => self.enemy(slot).map(|e| CombatantRef {
                current_hp: e.current_hp,
                max_hp: e.max_hp,
                block: e.current_block,
                statuses: &e.statuses,
            }),
        }
    }

    /// Mutable view of a combatant.
    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<CombatantMut<'_>> {
        match id {
            CombatantId::Player => Some(CombatantMut {
                current_hp: &mut self.player.current_hp,
                max_hp: self.player.max_hp,
                block: &mut self.block,
                statuses: &mut self.player.statuses,
                block_gained: None,
            }),
            CombatantId::Enemy(slot) => self.encounter.enemies.get_mut(slot).map(|e| CombatantMut {
                current_hp: &mut e.current_hp,
                max_hp: e.max_hp,
                block: &mut e.current_block,
                statuses: &mut e.statuses,
                block_gained: Some(&mut e.block_gained_this_turn),
            }),
        }
    }

    /// Check if a combatant exists and has HP left.
    #[must_use]
    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.combatant(id).is_some_and(|c| c.is_alive())
    }

    /// Living combatants opposing `actor`, in slot order.
    #[must_use]
    pub fn living_opponents(&self, actor: CombatantId) -> Vec<CombatantId> {
        match actor {
            CombatantId::Player => self
                .encounter
                .living_slots()
                .map(CombatantId::Enemy)
                .collect(),
            CombatantId::Enemy(_) if self.player.is_alive() => vec![CombatantId::Player],
            CombatantId::Enemy(_) => Vec::new(),
        }
    }

    /// Victory or defeat if either side is wiped out.
    ///
    /// Player death takes precedence when both happen in one step.
    #[must_use]
    pub fn terminal_outcome(&self) -> Option<BattleOutcome> {
        if !self.player.is_alive() {
            Some(BattleOutcome::Defeat)
        } else if self.encounter.all_defeated() {
            Some(BattleOutcome::Victory)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == BattlePhase::End
    }

    /// Append a log entry stamped with the current turn and phase.
    pub fn record(
        &mut self,
        actor: Option<CombatantId>,
        action: impl Into<String>,
        target: Option<CombatantId>,
        event: LogEvent,
    ) {
        self.log.push(self.turn, self.phase, actor, action, target, event);
    }

    /// Move to a new phase, logging the transition.
    pub fn set_phase(&mut self, phase: BattlePhase) {
        let from = self.phase;
        self.phase = phase;
        self.record(None, "phase", None, LogEvent::PhaseChanged { from, to: phase });
    }
}
