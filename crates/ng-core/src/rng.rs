//! Deterministic, splittable RNG wrapper.
//!
//! # Determinism strategy
//!
//! A run owns one root `SimRng` seeded from the configuration.  Every
//! consumer (moving spawner, external spawner, reroute policy, reporter)
//! receives its own child stream derived with [`SimRng::child`] and a fixed
//! offset, so the draws of one component never shift the draws of another.
//! Changing, say, the report probability therefore leaves the generated
//! trajectories untouched.
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Fixed child-stream offsets, one per consumer.
pub mod stream {
    pub const MOVING_SPAWN:   u64 = 1;
    pub const EXTERNAL_SPAWN: u64 = 2;
    pub const REROUTE:        u64 = 3;
    pub const REPORTER:       u64 = 4;
}

/// Seeded simulation RNG.
///
/// Used only in single-threaded contexts; parallel workers never draw.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent stream for `offset` from a root seed without
    /// consuming any draws from a shared generator.
    pub fn stream(seed: u64, offset: u64) -> SimRng {
        SimRng(SmallRng::seed_from_u64(seed ^ offset.wrapping_mul(MIXING_CONSTANT)))
    }

    /// Derive a child `SimRng` with a different seed offset.  Consumes one
    /// draw from `self`.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// `true` with probability `per_mille / 1000`.  `0` never fires and
    /// `1000` (or more) always fires without consuming a draw.
    #[inline]
    pub fn per_mille(&mut self, per_mille: u32) -> bool {
        match per_mille {
            0 => false,
            p if p >= 1000 => true,
            p => self.0.gen_range(0..1000) < p,
        }
    }

    /// Choose a random element from a slice, `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
