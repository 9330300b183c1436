//! Substitutable source of uniform random integers.
//!
//! Dice rolls, deck shuffles and decision draws all go through [`Randomizer`],
//! so tests can script exact outcomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A uniform random-integer source.
pub trait Randomizer {
    /// A uniform integer in `[lo, hi]`, inclusive on both ends.
    fn uniform(&mut self, lo: u32, hi: u32) -> u32;
}

/// Fisher-Yates shuffle driven by a [`Randomizer`].
pub fn shuffle<T>(rng: &mut dyn Randomizer, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.uniform(0, i as u32) as usize;
        items.swap(i, j);
    }
}

/// The default source, backed by [`StdRng`]. Seedable for reproducible games.
pub struct StdRandomizer {
    rng: StdRng,
}

impl StdRandomizer {
    pub fn from_entropy() -> Self {
        StdRandomizer {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        StdRandomizer {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Randomizer for StdRandomizer {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        self.rng.gen_range(lo..=hi)
    }
}
