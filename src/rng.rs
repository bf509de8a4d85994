//! Seeded, explicitly threaded random source.
//!
//! There is no global generator: every consumer receives a `SimRng` by `&mut`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Independent stream for one `(tick, salt)` pair under a base seed.
    ///
    /// Used to give each agent its own generator per tick so the result does
    /// not depend on the order agents are ticked in.
    pub fn fork(seed: u64, tick: u64, salt: u64) -> Self {
        let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
        for v in [tick, salt] {
            h = splitmix(h ^ v);
        }
        Self::new(h)
    }

    /// Uniform integer in `lo..hi`. Returns `lo` for an empty range.
    pub fn range(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            lo
        } else {
            self.0.random_range(lo..hi)
        }
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }
}

fn splitmix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
