//! Card definitions - static card data.
//!
//! A `CardData` has two facets:
//! - **Usage** (combat): cost, ordered effect list, tags
//! - **Structure** (synthesis): the components the card breaks down into
//!   and its synthesis level
//!
//! The combat core only reads the usage facet and the combat-relevant
//! tags; the structure facet is carried for the synthesis shop.

use serde::{Deserialize, Serialize};

use crate::core::CardId;
use crate::effects::CardEffect;

/// Elemental affinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    Fire,
    Ice,
    Physical,
}

/// Delivery form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormType {
    Melee,
    Ranged,
    Defense,
}

/// Utility function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtilityType {
    Buff,
    Draw,
    Heal,
}

/// Card tags, used for combat interactions and synthesis compatibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardTag {
    Fire,
    Ice,
    Physical,
    Melee,
    Ranged,
    Defense,
    Buff,
    Draw,
    Heal,
    Aoe,
    Dot,
    Control,
    /// Damage from this card ignores block.
    Piercing,
    /// Stays in hand at end of turn.
    Retain,
    /// Goes to the exhaust pile after being played.
    Exhaust,
}

/// Card rarity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardRarity {
    #[default]
    Basic,
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// What kind of component a card breaks down into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentKind {
    Element(ElementType),
    Form(FormType),
    Utility(UtilityType),
    Modifier,
}

/// A synthesis component obtained by breaking a card down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardComponent {
    pub id: String,
    pub name: String,
    pub kind: ComponentKind,
    #[serde(default)]
    pub description: Option<String>,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use synth_battle::cards::{CardData, CardTag};
/// use synth_battle::effects::CardEffect;
///
/// let bash = CardData::new("card_bash", "Bash", 2)
///     .with_effect(CardEffect::damage(8))
///     .with_tag(CardTag::Exhaust);
///
/// assert_eq!(bash.cost, 2);
/// assert!(bash.has_tag(CardTag::Exhaust));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rarity: CardRarity,

    // === Usage facet ===
    pub cost: i32,
    #[serde(default)]
    pub effects: Vec<CardEffect>,
    #[serde(default)]
    pub tags: Vec<CardTag>,

    // === Structure facet ===
    #[serde(default)]
    pub components: Vec<CardComponent>,
    #[serde(default = "default_synthesis_level")]
    pub synthesis_level: u8,

    // === Metadata ===
    #[serde(default)]
    pub starter: bool,
    #[serde(default = "default_true")]
    pub obtainable_in_run: bool,
}

fn default_synthesis_level() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

impl CardData {
    /// Create a card with no effects or tags.
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, cost: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            rarity: CardRarity::Basic,
            cost,
            effects: Vec::new(),
            tags: Vec::new(),
            components: Vec::new(),
            synthesis_level: 1,
            starter: false,
            obtainable_in_run: true,
        }
    }

    /// Append an effect (effects resolve in insertion order).
    #[must_use]
    pub fn with_effect(mut self, effect: CardEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: CardTag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Set rarity.
    #[must_use]
    pub fn with_rarity(mut self, rarity: CardRarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Add a synthesis component.
    #[must_use]
    pub fn with_component(mut self, component: CardComponent) -> Self {
        self.components.push(component);
        self
    }

    /// Check for a tag.
    #[must_use]
    pub fn has_tag(&self, tag: CardTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Damage from this card ignores block.
    #[must_use]
    pub fn is_piercing(&self) -> bool {
        self.has_tag(CardTag::Piercing)
    }

    /// Stays in hand at end of turn.
    #[must_use]
    pub fn is_retained(&self) -> bool {
        self.has_tag(CardTag::Retain)
    }

    /// Goes to the exhaust pile after play.
    #[must_use]
    pub fn exhausts(&self) -> bool {
        self.has_tag(CardTag::Exhaust)
    }
}
