//! Numeric value generators.

use rand::Rng;
use seed_core::MAX_SCORE;

/// Generate a uniformly random score in `min..=5`.
///
/// A `min` above the maximum collapses to the maximum.
pub fn generate_score<R: Rng>(rng: &mut R, min: u8) -> u8 {
    let min = min.min(MAX_SCORE);
    rng.gen_range(min..=MAX_SCORE)
}

/// Fair coin.
pub fn coin_flip<R: Rng>(rng: &mut R) -> bool {
    rng.gen_bool(0.5)
}
