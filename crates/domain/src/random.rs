//! Shared random source for selection, coin flips, and delays

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

/// Random source shared by the posting cycle and the formatter.
///
/// Seeding makes selection reproducible in tests; production uses entropy.
#[derive(Debug)]
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Uniform index into a collection of `len` elements
    pub fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.with_rng(|rng| rng.gen_range(0..len)))
    }

    /// Weighted coin flip; `probability` is clamped to [0, 1]
    pub fn chance(&self, probability: f64) -> bool {
        let p = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self.with_rng(|rng| rng.gen_bool(p))
    }

    /// Uniform duration in `[min, max]`; bounds are swapped if reversed
    pub fn duration_between(&self, min: Duration, max: Duration) -> Duration {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        if low == high {
            return low;
        }
        let millis = self.with_rng(|rng| rng.gen_range(low.as_millis()..=high.as_millis()));
        Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // RNG state stays valid across a poisoned lock.
        let mut guard = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
