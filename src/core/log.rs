//! Battle log: the append-only audit trail of a battle.
//!
//! Every resolved effect, status tick, phase change and intent produces one
//! `BattleLogEntry`. Entries carry post-values (`hp_after`, `block_after`,
//! `energy_after`) so the final HP and block of every combatant can be
//! rebuilt from the log alone (see [`BattleLog::replay_vitals`]).
//!
//! Sequence numbers replace wall-clock timestamps; two battles with the
//! same seed and the same player decisions produce byte-identical logs.
//!
//! ```
//! use synth_battle::core::{BattleLog, BattlePhase, CombatantId, LogEvent};
//!
//! let mut log = BattleLog::new();
//! log.push(1, BattlePhase::PlayerTurn, Some(CombatantId::Player), "Defend",
//!          Some(CombatantId::Player), LogEvent::Block { amount: 5, block_after: 5 });
//!
//! assert_eq!(log.len(), 1);
//! assert!(log.to_json_lines().unwrap().contains("\"Block\""));
//! ```

use std::collections::BTreeMap;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::entity::{CardId, CombatantId, InstanceId, SkillId, StatusId};
use super::state::BattlePhase;
use crate::battle::BattleOutcome;
use crate::enemies::IntentType;
use crate::status::{ApplyOutcome, StatusKind};

/// Why an effect or action did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The effect's trigger condition did not hold for this target.
    ConditionNotMet,
    /// The chosen target died earlier in the same resolution.
    TargetDefeated,
    /// The effect has no meaning for this actor or target (e.g. an enemy drawing).
    NotApplicable,
    /// The acting enemy is slowed.
    Slowed,
    /// The acting enemy has no announced intent.
    NoIntent,
}

/// What a log entry records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    /// Initial vitals of a combatant at battle start.
    CombatantJoined {
        name: String,
        hp: i32,
        max_hp: i32,
        block: i32,
    },
    PhaseChanged {
        from: BattlePhase,
        to: BattlePhase,
    },
    CardPlayed {
        instance: InstanceId,
        card: CardId,
        cost: i32,
        energy_after: i32,
    },
    SkillUsed {
        skill: SkillId,
        intent: IntentType,
    },
    IntentSet {
        skill: SkillId,
        intent: IntentType,
        damage: Option<i32>,
        hits: u32,
    },
    Damage {
        amount: i32,
        blocked: i32,
        hp_loss: i32,
        pierced: bool,
        hp_after: i32,
        block_after: i32,
    },
    Block {
        amount: i32,
        block_after: i32,
    },
    Heal {
        amount: i32,
        hp_after: i32,
    },
    Energy {
        delta: i32,
        energy_after: i32,
    },
    Draw {
        requested: u32,
        drawn: Vec<InstanceId>,
    },
    Reshuffle {
        cards: u32,
    },
    Discarded {
        cards: Vec<InstanceId>,
    },
    Exhausted {
        instance: InstanceId,
    },
    StatusApplied {
        status: StatusId,
        kind: StatusKind,
        outcome: ApplyOutcome,
        magnitude: i32,
        duration: i32,
    },
    /// A status ticked. `hp_after` is set when the tick dealt damage.
    StatusTicked {
        status: StatusId,
        kind: StatusKind,
        magnitude: i32,
        remaining: i32,
        expired: bool,
        hp_loss: i32,
        hp_after: Option<i32>,
    },
    BlockCleared {
        before: i32,
        block_after: i32,
    },
    EffectSkipped {
        reason: SkipReason,
    },
    ActionSkipped {
        reason: SkipReason,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl LogEvent {
    /// HP of the entry's target after this event, if it changed or was reported.
    #[must_use]
    pub fn hp_after(&self) -> Option<i32> {
        match self {
            LogEvent::CombatantJoined { hp, .. } => Some(*hp),
            LogEvent::Damage { hp_after, .. } | LogEvent::Heal { hp_after, .. } => Some(*hp_after),
            LogEvent::StatusTicked { hp_after, .. } => *hp_after,
            _ => None,
        }
    }

    /// Block of the entry's target after this event.
    #[must_use]
    pub fn block_after(&self) -> Option<i32> {
        match self {
            LogEvent::CombatantJoined { block, .. } => Some(*block),
            LogEvent::Damage { block_after, .. }
            | LogEvent::Block { block_after, .. }
            | LogEvent::BlockCleared { block_after, .. } => Some(*block_after),
            _ => None,
        }
    }
}

/// One immutable log record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLogEntry {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    pub turn: u32,
    pub phase: BattlePhase,
    /// `None` for engine bookkeeping (phase changes, ticks at battle level).
    pub actor: Option<CombatantId>,
    /// Human-readable action name (card name, skill name, "tick", ...).
    pub action: String,
    pub target: Option<CombatantId>,
    pub event: LogEvent,
}

/// Final HP/block of a combatant as rebuilt from the log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vitals {
    pub hp: i32,
    pub block: i32,
}

/// Append-only battle log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLog {
    entries: Vector<BattleLogEntry>,
}

impl BattleLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry; the sequence number is assigned here.
    pub fn push(
        &mut self,
        turn: u32,
        phase: BattlePhase,
        actor: Option<CombatantId>,
        action: impl Into<String>,
        target: Option<CombatantId>,
        event: LogEvent,
    ) {
        let entry = BattleLogEntry {
            sequence: self.entries.len() as u64,
            turn,
            phase,
            actor,
            action: action.into(),
            target,
            event,
        };
        self.entries.push_back(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleLogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&BattleLogEntry> {
        self.entries.last()
    }

    /// Entries from `start` to the end (the increment produced by one call).
    #[must_use]
    pub fn since(&self, start: usize) -> Vec<BattleLogEntry> {
        self.entries.iter().skip(start).cloned().collect()
    }

    /// Render as newline-delimited JSON, one entry per line.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Canonical binary form, used to compare logs byte for byte.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// Rebuild each combatant's final HP and block from the entries.
    #[must_use]
    pub fn replay_vitals(&self) -> BTreeMap<CombatantId, Vitals> {
        let mut vitals: BTreeMap<CombatantId, Vitals> = BTreeMap::new();

        for entry in &self.entries {
            let Some(target) = entry.target else {
                continue;
            };
            let hp = entry.event.hp_after();
            let block = entry.event.block_after();
            if hp.is_none() && block.is_none() {
                continue;
            }

            let slot = vitals.entry(target).or_default();
            if let Some(hp) = hp {
                slot.hp = hp;
            }
            if let Some(block) = block {
                slot.block = block;
            }
        }

        vitals
    }
}

impl<'a> IntoIterator for &'a BattleLog {
    type Item = &'a BattleLogEntry;
    type IntoIter = im::vector::Iter<'a, BattleLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> BattleLog {
        let mut log = BattleLog::new();
        log.push(
            1,
            BattlePhase::Start,
            None,
            "join",
            Some(CombatantId::Enemy(0)),
            LogEvent::CombatantJoined {
                name: "Slime".to_string(),
                hp: 20,
                max_hp: 20,
                block: 5,
            },
        );
        log.push(
            1,
            BattlePhase::PlayerTurn,
            Some(CombatantId::Player),
            "Strike",
            Some(CombatantId::Enemy(0)),
            LogEvent::Damage {
                amount: 6,
                blocked: 5,
                hp_loss: 1,
                pierced: false,
                hp_after: 19,
                block_after: 0,
            },
        );
        log
    }

    #[test]
    fn test_sequence_numbers() {
        let log = sample_log();
        let seqs: Vec<_> = log.iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(log.since(1).len(), 1);
        assert_eq!(log.last().unwrap().action, "Strike");
    }

    #[test]
    fn test_replay_vitals() {
        let vitals = sample_log().replay_vitals();
        assert_eq!(
            vitals[&CombatantId::Enemy(0)],
            Vitals { hp: 19, block: 0 }
        );
        assert!(!vitals.contains_key(&CombatantId::Player));
    }

    #[test]
    fn test_json_lines() {
        let text = sample_log().to_json_lines().unwrap();
        assert_eq!(text.lines().count(), 2);
        for line in text.lines() {
            let entry: BattleLogEntry = serde_json::from_str(line).unwrap();
            assert!(entry.turn == 1);
        }
    }

    #[test]
    fn test_bytes_stable() {
        let a = sample_log().to_bytes().unwrap();
        let b = sample_log().to_bytes().unwrap();
        assert_eq!(a, b);

        let decoded: BattleLog = bincode::deserialize(&a).unwrap();
        assert_eq!(decoded, sample_log());
    }
}
