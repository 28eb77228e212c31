//! Card instances - runtime card state.
//!
//! A `CardInstance` is one copy of a card in the player's deck. It is
//! created outside the battle (deck building, rewards) and persists across
//! battles; within a battle it only moves between piles.
//!
//! Upgrades are per instance: an upgraded copy may override the cost and
//! effect list of its definition. Per-turn modifiers (`cost_modifier`,
//! `temp_buff`) are cleared at the end of each player turn.

use serde::{Deserialize, Serialize};

use super::definition::CardData;
use crate::core::{CardId, InstanceId};
use crate::effects::CardEffect;

/// A card copy in the player's deck.
///
/// ## Example
///
/// ```
/// use synth_battle::cards::{CardData, CardInstance};
/// use synth_battle::core::InstanceId;
/// use synth_battle::effects::CardEffect;
///
/// let bash = CardData::new("card_bash", "Bash", 2).with_effect(CardEffect::damage(8));
/// let copy = CardInstance::new(InstanceId::new(1), "card_bash")
///     .upgraded_with(Some(1), None);
///
/// assert_eq!(copy.effective_cost(&bash), 1);
/// assert_eq!(copy.effective_effects(&bash).len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique for the run.
    pub instance_id: InstanceId,

    /// Reference to the card definition.
    pub card_id: CardId,

    #[serde(default)]
    pub upgraded: bool,

    /// Cost override while upgraded.
    #[serde(default)]
    pub upgraded_cost: Option<i32>,

    /// Effect list override while upgraded.
    #[serde(default)]
    pub upgraded_effects: Option<Vec<CardEffect>>,

    /// Added to the cost this turn (may be negative).
    #[serde(default)]
    pub cost_modifier: i32,

    /// Added to this card's DAMAGE effects this turn.
    #[serde(default)]
    pub temp_buff: i32,
}

impl CardInstance {
    /// Create an unupgraded instance.
    pub fn new(instance_id: InstanceId, card_id: impl Into<CardId>) -> Self {
        Self {
            instance_id,
            card_id: card_id.into(),
            upgraded: false,
            upgraded_cost: None,
            upgraded_effects: None,
            cost_modifier: 0,
            temp_buff: 0,
        }
    }

    /// Mark as upgraded with optional overrides.
    #[must_use]
    pub fn upgraded_with(mut self, cost: Option<i32>, effects: Option<Vec<CardEffect>>) -> Self {
        self.upgraded = true;
        self.upgraded_cost = cost;
        self.upgraded_effects = effects;
        self
    }

    /// Set this turn's cost modifier.
    #[must_use]
    pub fn with_cost_modifier(mut self, modifier: i32) -> Self {
        self.cost_modifier = modifier;
        self
    }

    /// Set this turn's damage buff.
    #[must_use]
    pub fn with_temp_buff(mut self, buff: i32) -> Self {
        self.temp_buff = buff;
        self
    }

    /// Energy needed to play this copy, never negative.
    #[must_use]
    pub fn effective_cost(&self, data: &CardData) -> i32 {
        let base = if self.upgraded {
            self.upgraded_cost.unwrap_or(data.cost)
        } else {
            data.cost
        };
        (base + self.cost_modifier).max(0)
    }

    /// Effects this copy resolves, in order.
    #[must_use]
    pub fn effective_effects<'a>(&'a self, data: &'a CardData) -> &'a [CardEffect] {
        match (&self.upgraded_effects, self.upgraded) {
            (Some(effects), true) => effects,
            _ => &data.effects,
        }
    }

    /// Clear per-turn modifiers.
    pub fn reset_turn_modifiers(&mut self) {
        self.cost_modifier = 0;
        self.temp_buff = 0;
    }

    #[must_use]
    pub fn has_turn_modifiers(&self) -> bool {
        self.cost_modifier != 0 || self.temp_buff != 0
    }
}
