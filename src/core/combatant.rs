//! Uniform access to the player and enemies for effect resolution.
//!
//! The player's block lives on `BattleState` while an enemy's lives on the
//! enemy, so these views borrow the relevant fields wherever they are.

use serde::{Deserialize, Serialize};

use crate::status::StatusList;

/// Result of damage hitting a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    /// Damage absorbed by block.
    pub blocked: i32,
    /// HP actually lost.
    pub hp_loss: i32,
    pub hp_after: i32,
    pub block_after: i32,
}

/// Read-only view of a combatant.
#[derive(Clone, Copy, Debug)]
pub struct CombatantRef<'a> {
    pub current_hp: i32,
    pub max_hp: i32,
    pub block: i32,
    pub statuses: &'a StatusList,
}

impl CombatantRef<'_> {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// `current_hp < max_hp * percent / 100`, without float rounding.
    #[must_use]
    pub fn hp_below_percent(&self, percent: u32) -> bool {
        i64::from(self.current_hp) * 100 < i64::from(self.max_hp) * i64::from(percent)
    }

    /// `current_hp > max_hp * percent / 100`, without float rounding.
    #[must_use]
    pub fn hp_above_percent(&self, percent: u32) -> bool {
        i64::from(self.current_hp) * 100 > i64::from(self.max_hp) * i64::from(percent)
    }
}

/// Mutable view of a combatant.
#[derive(Debug)]
pub struct CombatantMut<'a> {
    pub current_hp: &'a mut i32,
    pub max_hp: i32,
    pub block: &'a mut i32,
    pub statuses: &'a mut StatusList,
    /// Block gained this turn, tracked for enemies only.
    pub block_gained: Option<&'a mut i32>,
}

impl CombatantMut<'_> {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        *self.current_hp > 0
    }

    /// Apply damage. Block absorbs first unless `piercing`; the rest
    /// reduces HP, floored at 0.
    pub fn take_damage(&mut self, amount: i32, piercing: bool) -> DamageReport {
        let amount = amount.max(0);
        let blocked = if piercing { 0 } else { amount.min(*self.block) };
        let hp_loss = (amount - blocked).min(*self.current_hp);

        *self.block -= blocked;
        *self.current_hp -= hp_loss;

        DamageReport {
            blocked,
            hp_loss,
            hp_after: *self.current_hp,
            block_after: *self.block,
        }
    }

    /// Lose HP directly, ignoring block. Returns HP actually lost.
    pub fn lose_hp(&mut self, amount: i32) -> i32 {
        let loss = amount.max(0).min(*self.current_hp);
        *self.current_hp -= loss;
        loss
    }

    /// Add block (no upper bound). Returns block after.
    pub fn add_block(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        *self.block += amount;
        if let Some(gained) = self.block_gained.as_deref_mut() {
            *gained += amount;
        }
        *self.block
    }

    /// Heal up to max HP. Returns HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.max(0).min(self.max_hp - *self.current_hp).max(0);
        *self.current_hp += healed;
        healed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        hp: i32,
        block: i32,
        gained: i32,
        statuses: StatusList,
    }

    impl Fixture {
        fn new(hp: i32, block: i32) -> Self {
            Self {
                hp,
                block,
                gained: 0,
                statuses: StatusList::new(),
            }
        }

        fn view(&mut self) -> CombatantMut<'_> {
            CombatantMut {
                current_hp: &mut self.hp,
                max_hp: 20,
                block: &mut self.block,
                statuses: &mut self.statuses,
                block_gained: Some(&mut self.gained),
            }
        }
    }

    #[test]
    fn test_damage_block_then_hp() {
        let mut f = Fixture::new(20, 5);
        let report = f.view().take_damage(6, false);
        assert_eq!(report.blocked, 5);
        assert_eq!(report.hp_loss, 1);
        assert_eq!(report.block_after, 0);
        assert_eq!(report.hp_after, 19);
    }

    #[test]
    fn test_damage_piercing_ignores_block() {
        let mut f = Fixture::new(20, 10);
        let report = f.view().take_damage(8, true);
        assert_eq!(report.blocked, 0);
        assert_eq!(report.hp_after, 12);
        assert_eq!(report.block_after, 10);
    }

    #[test]
    fn test_damage_floors_hp() {
        let mut f = Fixture::new(3, 0);
        let report = f.view().take_damage(10, false);
        assert_eq!(report.hp_loss, 3);
        assert_eq!(report.hp_after, 0);
        assert!(!f.view().is_alive());
    }

    #[test]
    fn test_heal_capped() {
        let mut f = Fixture::new(18, 0);
        assert_eq!(f.view().heal(5), 2);
        assert_eq!(f.hp, 20);
    }

    #[test]
    fn test_block_tracks_gain() {
        let mut f = Fixture::new(20, 2);
        assert_eq!(f.view().add_block(4), 6);
        assert_eq!(f.gained, 4);
    }

    #[test]
    fn test_hp_thresholds() {
        let statuses = StatusList::new();
        let view = CombatantRef {
            current_hp: 9,
            max_hp: 20,
            block: 0,
            statuses: &statuses,
        };
        assert!(view.hp_below_percent(50));
        assert!(!view.hp_below_percent(45));
        assert!(view.hp_above_percent(40));
    }
}
