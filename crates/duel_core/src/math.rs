//! Fixed-point hit probabilities.
//!
//! Expected-damage comparisons use fixed-point arithmetic so that range
//! selection is identical on every platform and thread.

use fixed::types::I32F32;

/// Fixed-point number type for probability math.
pub type Fixed = I32F32;

/// Number of ways (out of 36) that 2d6 meets or beats each target number.
///
/// Indexed by target number; entries 0 and 1 are always hit.
const HITS_IN_36: [u32; 13] = [36, 36, 36, 35, 33, 30, 26, 21, 15, 10, 6, 3, 1];

/// Ways out of 36 to roll at least `target` on 2d6, clamped to 2..=12.
#[must_use]
pub fn hits_in_36(target: i32) -> u32 {
    let index = target.clamp(2, 12) as usize;
    HITS_IN_36[index]
}

/// Probability of rolling at least `target` on 2d6.
#[must_use]
pub fn hit_probability(target: i32) -> Fixed {
    Fixed::from_num(hits_in_36(target)) / Fixed::from_num(36)
}

/// Expected damage of a weapon value against a target number.
///
/// Computed as `damage * hits / 36` in one step so equal products compare equal.
/// Products beyond the fixed-point range saturate.
#[must_use]
pub fn expected_damage(damage: u32, target: i32) -> Fixed {
    let ways = u64::from(damage) * u64::from(hits_in_36(target));
    Fixed::saturating_from_num(ways) / Fixed::from_num(36)
}

/// Integer half, rounded up.
#[must_use]
pub const fn half_round_up(value: u32) -> u32 {
    value.div_ceil(2)
}
