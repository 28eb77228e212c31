//! The battle state machine and its inputs and outputs.
//!
//! - `Battle`: owns state, RNG and config for one fight; every player call
//!   is transactional
//! - `ContentCatalog` / `PlayerLoadout`: what a battle is built from
//! - `StepOutcome`: log entries and phase produced by one call
//! - `BattleHistory`: the archived summary once the battle ends

mod engine;
mod history;
mod setup;

pub use engine::{start_battle, Battle, StepOutcome};
pub use history::{BattleHistory, BattleOutcome};
pub use setup::{ContentCatalog, PlayerLoadout};
