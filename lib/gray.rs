//! Binary-reflected Gray-code utilities.
//!
//! The *k*-th Gray code is `k ^ (k >> 1)`. Restricted to `0..2^n`, the
//! sequence visits every *n*-bit value exactly once, and consecutive codes
//! (including the wrap from `2^n - 1` back to 0) differ in exactly one bit.
//! Interpreting each code as a bitmask over matrix columns turns subset
//! enumeration into a chain of single-column updates, which is what makes
//! Ryser's formula evaluable in *O*(2<sup>*n*</sup> *n*) time overall.

/// Return the `k`-th binary-reflected Gray code.
#[inline]
pub fn code(k: usize) -> usize { k ^ (k >> 1) }

/// Identify the single bit flipped between two consecutive Gray codes.
///
/// Returns the flipped bit's position together with `true` if the bit turns
/// on going from `old` to `new` (`false` if it turns off), or `None` if the
/// codes are equal or differ in more than one bit.
#[inline]
pub fn flip_between(old: usize, new: usize) -> Option<(usize, bool)> {
    let diff = old ^ new;
    if !diff.is_power_of_two() { return None; }
    Some((diff.trailing_zeros() as usize, new & diff != 0))
}
