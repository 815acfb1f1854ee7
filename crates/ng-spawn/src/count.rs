//! Per-tick spawn counts.

use rand_distr::{Distribution, Poisson};

use ng_core::{SimRng, Tick};

/// Number of objects to create at `now`.
///
/// Tick 0 uses `at_begin`, later ticks `per_time`.  In probabilistic mode
/// the mean is the rate of a Poisson draw; otherwise it is used as is.
pub fn spawn_count(rng: &mut SimRng, now: Tick, per_time: u32, at_begin: u32, probabilistic: bool) -> u32 {
    let mean = if now.is_first() { at_begin } else { per_time };
    if !probabilistic || mean == 0 {
        return mean;
    }
    match Poisson::new(f64::from(mean)) {
        Ok(dist) => {
            let draw: f64 = dist.sample(rng.inner());
            draw as u32
        }
        Err(_) => mean,
    }
}
