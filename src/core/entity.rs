//! Identifiers for battle participants and content.
//!
//! ## Runtime IDs
//!
//! - `InstanceId`: a specific card copy, unique for the lifetime of a run
//! - `CombatantId`: the player or an enemy slot in the current encounter
//!
//! ## Content IDs
//!
//! Content is authored with string keys (`"card_fireball"`, `"slime"`), so
//! card, skill, enemy, status and encounter IDs wrap a `String` and
//! serialize transparently.
//!
//! ```
//! use synth_battle::core::{CardId, CombatantId};
//!
//! let strike = CardId::new("card_strike");
//! assert_eq!(strike.as_str(), "card_strike");
//!
//! assert!(CombatantId::Player.is_player());
//! assert_eq!(CombatantId::Enemy(1).enemy_index(), Some(1));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance.
///
/// Allocated outside the battle core (deck building, rewards) and
/// stable across battles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for InstanceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// A participant in a battle.
///
/// Enemies are addressed by their slot in the encounter's enemy list,
/// which never changes during a battle (dead enemies keep their slot).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatantId {
    /// The player.
    Player,
    /// The enemy at the given encounter slot.
    Enemy(usize),
}

impl CombatantId {
    /// Check if this refers to the player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, CombatantId::Player)
    }

    /// Get the enemy slot if this refers to an enemy.
    #[must_use]
    pub const fn enemy_index(self) -> Option<usize> {
        match self {
            CombatantId::Enemy(index) => Some(index),
            CombatantId::Player => None,
        }
    }

    /// Check if two combatants are on opposite sides.
    #[must_use]
    pub const fn opposes(self, other: CombatantId) -> bool {
        self.is_player() != other.is_player()
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatantId::Player => write!(f, "Player"),
            CombatantId::Enemy(index) => write!(f, "Enemy({})", index),
        }
    }
}

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new ID from its content key.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Get the content key.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self::new(key)
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }
    };
}

content_id!(
    /// Card definition identifier.
    CardId,
    "Card"
);
content_id!(
    /// Enemy skill identifier, unique within one enemy definition.
    SkillId,
    "Skill"
);
content_id!(
    /// Enemy definition identifier.
    EnemyId,
    "Enemy"
);
content_id!(
    /// Status effect identifier. Statuses with the same ID stack or replace.
    StatusId,
    "Status"
);
content_id!(
    /// Encounter definition identifier.
    EncounterId,
    "Encounter"
);
