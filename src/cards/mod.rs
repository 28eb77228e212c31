//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardData`: static card definition (usage and structure facets)
//! - `CardTag`: combat and synthesis tags (PIERCING, RETAIN, EXHAUST, ...)
//! - `CardInstance`: one copy in the deck, with upgrade overrides and
//!   per-turn modifiers
//! - `CardRegistry`: card definition lookup

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{
    CardComponent, CardData, CardRarity, CardTag, ComponentKind, ElementType, FormType,
    UtilityType,
};
pub use instance::CardInstance;
pub use registry::CardRegistry;
