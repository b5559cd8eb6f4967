//! # Perfect Power — Step 1 of AKS
//!
//! Decides whether n = a^b for integers a > 1, b > 1. Every candidate
//! exponent b ≤ ⌊log₂ n⌋ + 1 is tried with an exact integer root from
//! [`crate::arith::root_rem`]; a perfect power is definitely composite.

use rug::Integer;

use crate::arith::root_rem;

/// Returns `(a, b)` with `a^b == n`, `a > 1`, `b > 1`, using the smallest
/// such `b`, or `None` when `n` is not a perfect power.
pub fn perfect_power_decomposition(n: &Integer) -> Option<(Integer, u32)> {
    if *n < 4u32 {
        return None;
    }
    // significant_bits = floor(log2 n) + 1
    let max_exp = n.significant_bits();
    (2..=max_exp).find_map(|b| {
        let (a, exact) = root_rem(n, b);
        (exact && a > 1u32).then_some((a, b))
    })
}

/// True iff `n` is a perfect power a^b with a > 1 and b > 1.
pub fn is_perfect_power(n: &Integer) -> bool {
    perfect_power_decomposition(n).is_some()
}
