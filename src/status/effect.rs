//! Status effect definitions.

use serde::{Deserialize, Serialize};

use crate::core::StatusId;

/// Duration value for statuses that never expire.
pub const PERMANENT: i32 = -1;

/// Whether a status helps or hinders its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusType {
    Buff,
    Debuff,
}

/// When a status ticks relative to its owner's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickTiming {
    TurnStart,
    TurnEnd,
}

/// The closed set of statuses the engine knows how to apply.
///
/// Each kind has a fixed tick timing and type; stackability is a
/// default that content may override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    /// Deals `magnitude` damage to the owner at turn start, ignoring block.
    Dot,
    /// Adds `magnitude` to the owner's outgoing damage.
    DamageUp,
    /// Subtracts `magnitude` from the owner's outgoing damage.
    Weak,
    /// Player: `magnitude` less energy at turn start. Enemy: skips its action.
    Slow,
}

impl StatusKind {
    /// Buff or debuff.
    #[must_use]
    pub const fn status_type(self) -> StatusType {
        match self {
            StatusKind::DamageUp => StatusType::Buff,
            StatusKind::Dot | StatusKind::Weak | StatusKind::Slow => StatusType::Debuff,
        }
    }

    /// Tick point for this kind.
    #[must_use]
    pub const fn timing(self) -> TickTiming {
        match self {
            StatusKind::Dot => TickTiming::TurnStart,
            StatusKind::DamageUp | StatusKind::Weak | StatusKind::Slow => TickTiming::TurnEnd,
        }
    }

    /// Whether repeated applications add up by default.
    #[must_use]
    pub const fn default_stackable(self) -> bool {
        matches!(self, StatusKind::Dot | StatusKind::DamageUp)
    }

    /// Default status id for this kind.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            StatusKind::Dot => "dot",
            StatusKind::DamageUp => "damage_up",
            StatusKind::Weak => "weak",
            StatusKind::Slow => "slow",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            StatusKind::Dot => "Burn",
            StatusKind::DamageUp => "Strength",
            StatusKind::Weak => "Weak",
            StatusKind::Slow => "Slow",
        }
    }
}

/// A status effect attached to a combatant.
///
/// ## Example
///
/// ```
/// use synth_battle::status::{StatusEffect, StatusKind, StatusType};
///
/// let burn = StatusEffect::new(StatusKind::Dot, 3, 2);
/// assert_eq!(burn.id.as_str(), "dot");
/// assert_eq!(burn.status_type(), StatusType::Debuff);
/// assert!(burn.stackable);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Statuses with the same id stack or replace each other.
    pub id: StatusId,
    pub name: String,
    pub kind: StatusKind,
    pub magnitude: i32,
    /// Remaining ticks; [`PERMANENT`] never expires.
    pub duration: i32,
    pub stackable: bool,
    #[serde(default)]
    pub description: String,
}

impl StatusEffect {
    /// Create a status with the kind's default id, name and stackability.
    #[must_use]
    pub fn new(kind: StatusKind, magnitude: i32, duration: i32) -> Self {
        Self {
            id: StatusId::new(kind.key()),
            name: kind.label().to_string(),
            kind,
            magnitude,
            duration,
            stackable: kind.default_stackable(),
            description: String::new(),
        }
    }

    /// Use a custom id (separate stacks for the same kind).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<StatusId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override stackability.
    #[must_use]
    pub fn with_stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }

    #[must_use]
    pub fn status_type(&self) -> StatusType {
        self.kind.status_type()
    }

    #[must_use]
    pub fn timing(&self) -> TickTiming {
        self.kind.timing()
    }

    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.duration == PERMANENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table() {
        assert_eq!(StatusKind::Dot.timing(), TickTiming::TurnStart);
        assert_eq!(StatusKind::Weak.timing(), TickTiming::TurnEnd);
        assert_eq!(StatusKind::DamageUp.status_type(), StatusType::Buff);
        assert_eq!(StatusKind::Slow.status_type(), StatusType::Debuff);
        assert!(StatusKind::DamageUp.default_stackable());
        assert!(!StatusKind::Weak.default_stackable());
    }

    #[test]
    fn test_builder() {
        let status = StatusEffect::new(StatusKind::Weak, 2, PERMANENT)
            .with_id("curse")
            .with_name("Curse")
            .with_stackable(true);

        assert_eq!(status.id, StatusId::new("curse"));
        assert_eq!(status.name, "Curse");
        assert!(status.stackable);
        assert!(status.is_permanent());
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "id": "frail", "name": "Frail", "kind": "WEAK",
            "magnitude": 2, "duration": 3, "stackable": false
        }"#;
        let status: StatusEffect = serde_json::from_str(json).unwrap();
        assert_eq!(status.kind, StatusKind::Weak);
        assert_eq!(status.duration, 3);
        assert!(status.description.is_empty());
    }
}
