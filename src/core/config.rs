//! Battle configuration.
//!
//! `GameConfig` carries the run-wide settings the combat core reads:
//! hand size, energy, difficulty multipliers and a few rule toggles.
//! It is read-only for the duration of a battle.
//!
//! Configs deserialize with per-field defaults, so content files only
//! need to list what they override:
//!
//! ```
//! use synth_battle::core::GameConfig;
//!
//! let config: GameConfig = serde_json::from_str(r#"{ "hand_size": 6 }"#).unwrap();
//! assert_eq!(config.hand_size, 6);
//! assert_eq!(config.energy_per_turn, 3);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::error::{BattleError, BattleResult};

/// Names a configuration field that failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigField {
    HandSize,
    EnergyPerTurn,
    MaxEnergy,
    StartingHp,
    EnemyHealthMultiplier,
    EnemyDamageMultiplier,
}

/// Run-wide settings consumed by the battle core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cards drawn up to at the start of each player turn.
    pub hand_size: usize,

    /// Energy granted at the start of each player turn.
    pub energy_per_turn: i32,

    /// Upper bound on energy within a turn.
    pub max_energy: i32,

    /// Player HP when a loadout is built from config.
    pub starting_hp: i32,

    /// Player max HP when a loadout is built from config.
    pub starting_max_hp: i32,

    /// Scales enemy max HP at battle start (rounded, at least 1).
    pub enemy_health_multiplier: f32,

    /// Scales enemy skill damage (rounded).
    pub enemy_damage_multiplier: f32,

    /// How many recently used skills an enemy avoids repeating.
    pub anti_repeat_window: usize,

    /// Keep player block across turns instead of clearing it.
    pub retain_player_block: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_size: 5,
            energy_per_turn: 3,
            max_energy: 3,
            starting_hp: 80,
            starting_max_hp: 80,
            enemy_health_multiplier: 1.0,
            enemy_damage_multiplier: 1.0,
            anti_repeat_window: 1,
            retain_player_block: false,
        }
    }
}

impl GameConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set energy per turn and max energy together.
    #[must_use]
    pub fn with_energy(mut self, energy_per_turn: i32, max_energy: i32) -> Self {
        self.energy_per_turn = energy_per_turn;
        self.max_energy = max_energy;
        self
    }

    /// Set starting HP (current and max).
    #[must_use]
    pub fn with_starting_hp(mut self, hp: i32) -> Self {
        self.starting_hp = hp;
        self.starting_max_hp = hp;
        self
    }

    /// Set difficulty multipliers.
    #[must_use]
    pub fn with_enemy_multipliers(mut self, health: f32, damage: f32) -> Self {
        self.enemy_health_multiplier = health;
        self.enemy_damage_multiplier = damage;
        self
    }

    /// Set the anti-repetition window length.
    #[must_use]
    pub fn with_anti_repeat_window(mut self, window: usize) -> Self {
        self.anti_repeat_window = window;
        self
    }

    /// Keep player block across turns.
    #[must_use]
    pub fn retaining_block(mut self) -> Self {
        self.retain_player_block = true;
        self
    }

    /// Check every field is within range.
    pub fn validate(&self) -> BattleResult<()> {
        let checks = [
            (self.hand_size > 0, ConfigField::HandSize),
            (self.max_energy > 0, ConfigField::MaxEnergy),
            (
                (0..=self.max_energy).contains(&self.energy_per_turn),
                ConfigField::EnergyPerTurn,
            ),
            (
                self.starting_max_hp > 0 && (1..=self.starting_max_hp).contains(&self.starting_hp),
                ConfigField::StartingHp,
            ),
            (
                self.enemy_health_multiplier.is_finite() && self.enemy_health_multiplier > 0.0,
                ConfigField::EnemyHealthMultiplier,
            ),
            (
                self.enemy_damage_multiplier.is_finite() && self.enemy_damage_multiplier >= 0.0,
                ConfigField::EnemyDamageMultiplier,
            ),
        ];

        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, field)) => Err(BattleError::InvalidConfig(*field)),
            None => Ok(()),
        }
    }

    /// Apply the health multiplier to an enemy's base HP.
    #[must_use]
    pub fn scale_enemy_hp(&self, hp: i32) -> i32 {
        ((hp as f32 * self.enemy_health_multiplier).round() as i32).max(1)
    }

    /// Apply the damage multiplier to an enemy skill's damage.
    #[must_use]
    pub fn scale_enemy_damage(&self, damage: i32) -> i32 {
        ((damage as f32 * self.enemy_damage_multiplier).round() as i32).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = GameConfig::default();
        assert_eq!(config.hand_size, 5);
        assert_eq!(config.energy_per_turn, 3);
        assert_eq!(config.anti_repeat_window, 1);
        assert!(!config.retain_player_block);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new()
            .with_hand_size(7)
            .with_energy(4, 5)
            .with_starting_hp(50)
            .with_anti_repeat_window(2)
            .retaining_block();

        assert_eq!(config.hand_size, 7);
        assert_eq!(config.energy_per_turn, 4);
        assert_eq!(config.max_energy, 5);
        assert_eq!(config.starting_hp, 50);
        assert_eq!(config.starting_max_hp, 50);
        assert_eq!(config.anti_repeat_window, 2);
        assert!(config.retain_player_block);
    }

    #[test]
    fn test_validate_rejects() {
        let err = GameConfig::new().with_hand_size(0).validate().unwrap_err();
        assert_eq!(err, BattleError::InvalidConfig(ConfigField::HandSize));

        let err = GameConfig::new().with_energy(5, 3).validate().unwrap_err();
        assert_eq!(err, BattleError::InvalidConfig(ConfigField::EnergyPerTurn));

        let err = GameConfig::new()
            .with_enemy_multipliers(0.0, 1.0)
            .validate()
            .unwrap_err();
        assert_eq!(err, BattleError::InvalidConfig(ConfigField::EnemyHealthMultiplier));
    }

    #[test]
    fn test_multipliers() {
        let config = GameConfig::new().with_enemy_multipliers(1.5, 0.5);
        assert_eq!(config.scale_enemy_hp(20), 30);
        assert_eq!(config.scale_enemy_damage(7), 4);

        let tiny = GameConfig::new().with_enemy_multipliers(0.01, 1.0);
        assert_eq!(tiny.scale_enemy_hp(10), 1);
    }

    #[test]
    fn test_partial_json() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "energy_per_turn": 2, "retain_player_block": true }"#).unwrap();
        assert_eq!(config.energy_per_turn, 2);
        assert_eq!(config.max_energy, 3);
        assert!(config.retain_player_block);
    }
}
