//! Bounded random-walk steps.
//!
//! A step draws a uniform delta from an inclusive range, adds it to the
//! current value and clamps the result. No momentum carries between steps.

use invensync_core::{IntRange, RealRange};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// RNG used by every manager. Seeded for reproducibility.
pub type SimRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform integer in `[range.min, range.max]`.
pub fn draw_int<R: Rng>(rng: &mut R, range: &IntRange) -> i64 {
    rng.gen_range(range.min..=range.max)
}

/// Uniform real in `[range.min, range.max]`.
pub fn draw_real<R: Rng>(rng: &mut R, range: &RealRange) -> f64 {
    rng.gen_range(range.min..=range.max)
}

/// Add `delta` to a non-negative count, saturating at `floor` and `u32::MAX`.
pub fn offset_count(value: u32, delta: i64, floor: u32) -> u32 {
    let next = i64::from(value).saturating_add(delta);
    next.clamp(i64::from(floor), i64::from(u32::MAX)) as u32
}

/// One random step of a non-negative count.
pub fn step_count<R: Rng>(rng: &mut R, value: u32, delta: &IntRange, floor: u32) -> u32 {
    offset_count(value, draw_int(rng, delta), floor)
}

/// One random step of an integer clamped to `bounds`.
pub fn step_int<R: Rng>(rng: &mut R, value: i64, delta: &IntRange, bounds: &IntRange) -> i64 {
    bounds.clamp(value.saturating_add(draw_int(rng, delta)))
}

/// One random step of a real clamped to `bounds`.
pub fn step_real<R: Rng>(rng: &mut R, value: f64, delta: &RealRange, bounds: &RealRange) -> f64 {
    bounds.clamp(value + draw_real(rng, delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_seed_same_walk() {
        let delta = IntRange::new(-3, 2);
        let mut a = seeded_rng(7);
        let mut b = seeded_rng(7);
        let wa: Vec<u32> = (0..50).map(|_| step_count(&mut a, 20, &delta, 0)).collect();
        let wb: Vec<u32> = (0..50).map(|_| step_count(&mut b, 20, &delta, 0)).collect();
        assert_eq!(wa, wb);
    }

    #[test]
    fn count_saturates_at_floor() {
        assert_eq!(offset_count(1, -3, 0), 0);
        assert_eq!(offset_count(3, -1, 3), 3);
        assert_eq!(offset_count(u32::MAX, 5, 0), u32::MAX);
        assert_eq!(offset_count(23, 3, 0), 26);
    }

    #[test]
    fn degenerate_ranges_are_constant() {
        let mut rng = seeded_rng(1);
        assert_eq!(draw_int(&mut rng, &IntRange::new(4, 4)), 4);
        assert_eq!(draw_real(&mut rng, &RealRange::new(0.5, 0.5)), 0.5);
    }

    proptest! {
        #[test]
        fn draws_stay_in_range(seed in any::<u64>(), lo in -50i64..50, span in 0i64..50) {
            let mut rng = seeded_rng(seed);
            let range = IntRange::new(lo, lo + span);
            for _ in 0..20 {
                let d = draw_int(&mut rng, &range);
                prop_assert!(d >= range.min && d <= range.max);
            }
        }

        #[test]
        fn real_steps_respect_bounds(seed in any::<u64>(), start in 18.0f64..30.0) {
            let mut rng = seeded_rng(seed);
            let bounds = RealRange::new(18.0, 30.0);
            let delta = RealRange::new(-1.0, 1.0);
            let mut t = start;
            for _ in 0..100 {
                t = step_real(&mut rng, t, &delta, &bounds);
                prop_assert!(bounds.contains(t));
            }
        }
    }
}
