//! Per-combatant status storage with apply/tick semantics.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::effect::{StatusEffect, StatusKind, StatusType, TickTiming, PERMANENT};
use crate::core::StatusId;

/// How `apply` changed the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyOutcome {
    /// No status with that id existed.
    Inserted,
    /// Magnitudes summed, longer duration kept.
    Stacked,
    /// Existing entry overwritten in place.
    Replaced,
}

/// Report for one status processed by `tick`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTick {
    pub id: StatusId,
    pub kind: StatusKind,
    /// Magnitude of the recurring effect, 0 if it did not fire.
    pub magnitude: i32,
    /// False for statuses that were already at duration 0.
    pub fired: bool,
    /// Duration after the tick.
    pub remaining: i32,
    /// The status was removed by this tick.
    pub expired: bool,
}

/// Statuses on one combatant, in application order.
///
/// Buffs and debuffs share one list so ticking follows insertion order
/// across both; `buffs()`/`debuffs()` give filtered views.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusList {
    entries: Vector<StatusEffect>,
}

impl StatusList {
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

    /// Iterate in application order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.entries.iter()
    }

    pub fn buffs(&self) -> impl Iterator<Item = &StatusEffect> {
        self.iter().filter(|s| s.status_type() == StatusType::Buff)
    }

    pub fn debuffs(&self) -> impl Iterator<Item = &StatusEffect> {
        self.iter().filter(|s| s.status_type() == StatusType::Debuff)
    }

    #[must_use]
    pub fn get(&self, id: &StatusId) -> Option<&StatusEffect> {
        self.entries.iter().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn has(&self, id: &StatusId) -> bool {
        self.get(id).is_some()
    }

    /// Add a status, stacking or replacing an existing one with the same id.
    ///
    /// Stacking follows the existing entry's `stackable` flag. A permanent
    /// duration on either side stays permanent.
    pub fn apply(&mut self, effect: StatusEffect) -> ApplyOutcome {
        let Some(index) = self.entries.iter().position(|s| s.id == effect.id) else {
            self.entries.push_back(effect);
            return ApplyOutcome::Inserted;
        };

        let existing = &mut self.entries[index];
        if existing.stackable {
            existing.magnitude += effect.magnitude;
            existing.duration = if existing.duration == PERMANENT || effect.duration == PERMANENT {
                PERMANENT
            } else {
                existing.duration.max(effect.duration)
            };
            ApplyOutcome::Stacked
        } else {
            *existing = effect;
            ApplyOutcome::Replaced
        }
    }

    /// Remove a status by id.
    pub fn remove(&mut self, id: &StatusId) -> Option<StatusEffect> {
        let index = self.entries.iter().position(|s| &s.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Tick every status with the given timing, oldest first.
    ///
    /// Each matching status fires (the caller applies its recurring effect
    /// from the report), then loses one duration unless permanent. Statuses
    /// reaching 0 are removed. A status already at 0 is removed without
    /// firing.
    pub fn tick(&mut self, timing: TickTiming) -> Vec<StatusTick> {
        let mut reports = Vec::new();
        let mut kept = Vector::new();

        for mut status in std::mem::take(&mut self.entries) {
            if status.timing() != timing {
                kept.push_back(status);
                continue;
            }

            let fired = status.duration != 0;
            if fired && !status.is_permanent() {
                status.duration -= 1;
            }
            let expired = status.duration == 0;

            reports.push(StatusTick {
                id: status.id.clone(),
                kind: status.kind,
                magnitude: if fired { status.magnitude } else { 0 },
                fired,
                remaining: status.duration,
                expired,
            });

            if !expired {
                kept.push_back(status);
            }
        }

        self.entries = kept;
        reports
    }

    /// Sum of a kind's magnitudes.
    #[must_use]
    pub fn total(&self, kind: StatusKind) -> i32 {
        self.iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.magnitude)
            .sum()
    }

    /// Outgoing damage modifier: DamageUp minus Weak.
    #[must_use]
    pub fn damage_modifier(&self) -> i32 {
        self.total(StatusKind::DamageUp) - self.total(StatusKind::Weak)
    }

    #[must_use]
    pub fn is_slowed(&self) -> bool {
        self.iter().any(|s| s.kind == StatusKind::Slow)
    }
}
