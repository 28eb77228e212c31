//! Deterministic random number generation for battles.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed and call order produce identical results
//! - **Draw-indexed**: Every random decision (shuffle, target pick, AI
//!   choice) consumes one draw index and is keyed off `seed + index`
//! - **Serializable**: O(1) state capture and restore
//!
//! Keying each decision off its draw index (rather than a long-running
//! stream) means a replay only has to agree on the *order* of random
//! decisions, never on how many words each one consumed.
//!
//! ```
//! use synth_battle::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut replay = GameRng::new(42);
//!
//! let mut a = vec![1, 2, 3, 4, 5];
//! let mut b = a.clone();
//! rng.shuffle(&mut a);
//! replay.shuffle(&mut b);
//!
//! assert_eq!(a, b);
//! assert_eq!(rng.draw_index(), 1);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const DRAW_KEY_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic RNG threaded through every randomized battle decision.
///
/// Uses ChaCha8 seeded per draw event, so the generator itself is just
/// `(seed, draw_index)` and clones are free.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameRng {
    seed: u64,
    draw_index: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draw_index: 0,
        }
    }

    /// The run seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draw events consumed so far.
    #[must_use]
    pub fn draw_index(&self) -> u64 {
        self.draw_index
    }

    /// Open the generator for the next draw event.
    fn next_stream(&mut self) -> ChaCha8Rng {
        self.draw_index += 1;
        let key = self
            .seed
            .wrapping_add(self.draw_index.wrapping_mul(DRAW_KEY_STRIDE));
        ChaCha8Rng::seed_from_u64(key)
    }

    /// Shuffle a slice in place. Consumes one draw event.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        let mut stream = self.next_stream();
        slice.shuffle(&mut stream);
    }

    /// Pick a uniform index in `0..len`. Consumes one draw event.
    ///
    /// Returns `None` (without consuming) when `len` is zero.
    pub fn gen_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let mut stream = self.next_stream();
        Some(stream.gen_range(0..len))
    }

    /// Choose an index with weighted probability. Consumes one draw event.
    ///
    /// Zero weights are never chosen. Returns `None` (without consuming)
    /// if weights are empty or all zero.
    pub fn choose_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut stream = self.next_stream();
        let mut threshold = stream.gen_range(0..total);

        for (i, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if threshold < weight {
                return Some(i);
            }
            threshold -= weight;
        }

        // Unreachable while threshold < total; keep the last nonzero weight
        weights.iter().rposition(|&w| w > 0)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            draw_index: self.draw_index,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        Self {
            seed: state.seed,
            draw_index: state.draw_index,
        }
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// Draw events consumed
    pub draw_index: u64,
}
