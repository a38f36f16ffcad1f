//! Seedable generator behind the `demo` feed.  Reproducible with
//! `--seed`, otherwise seeded from the clock.

use std::time::{SystemTime, UNIX_EPOCH};

const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const INCREMENT: u64 = 1_442_695_040_888_963_407;
/// Used when the clock reads before the epoch.
const FALLBACK_SEED: u64 = 0x2545_f491_4f6c_dd1d;

/// 64-bit linear congruential generator; output is the high word.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    #[must_use]
    pub fn seed(seed: u64) -> Self {
        Self { state: seed }
    }

    #[must_use]
    pub fn seed_from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(FALLBACK_SEED, |d| {
                // low bits vary fastest, which is all a seed needs
                #[allow(clippy::cast_possible_truncation)]
                let n = d.as_nanos() as u64;
                n
            });
        Self::seed(nanos)
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        #[allow(clippy::cast_possible_truncation)]
        let hi = (self.state >> 32) as u32;
        hi
    }

    /// Whole number drawn uniformly from `[low, high)`.  `high <= low`
    /// yields `low`.
    pub fn int_in(&mut self, low: i32, high: i32) -> i32 {
        let span = i64::from(high) - i64::from(low);
        if span <= 0 {
            return low;
        }
        // scale the 32-bit draw into the span: offset < span
        let offset = (u64::from(self.step()) * span.unsigned_abs()) >> 32;
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let v = (i64::from(low) + offset as i64) as i32;
        v
    }
}
