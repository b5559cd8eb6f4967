//! # Order — Multiplicative Order and the Search for r
//!
//! Step 2 of AKS: find the smallest r with gcd(r, n) = 1 and
//! ord_r(n) > (log₂ n)². The AKS paper bounds that r by
//! max(3, ⌈log₂ n⌉⁵); the scan enforces the bound and reports a fatal error if
//! it is ever crossed rather than looping forever.
//!
//! Orders are computed by stepping n^k mod r for k = 1, 2, … with u128
//! intermediates. The loop is bounded by r because the order divides
//! φ(r) ≤ r − 1.

use anyhow::{bail, Result};
use rug::Integer;
use tracing::debug;

use crate::arith::{gcd_u64, log2, mod_u64};

/// Least k ≥ 1 with n^k ≡ 1 (mod r), or `None` when gcd(r, n) ≠ 1.
///
/// `r == 0` yields `None`; `r == 1` yields `Some(1)` since every integer is
/// congruent to 1 modulo 1.
pub fn multiplicative_order(r: u64, n: &Integer) -> Option<u64> {
    if r == 0 || gcd_u64(n, r) != 1 {
        return None;
    }
    if r == 1 {
        return Some(1);
    }
    let base = mod_u64(n, r) as u128;
    let modulus = r as u128;
    let mut acc: u128 = 1;
    (1..r).find(|_| {
        acc = acc * base % modulus;
        acc == 1
    })
}

/// Upper bound on the r search from the AKS paper: max(3, ⌈log₂ n⌉⁵).
///
/// `significant_bits` is ⌈log₂ n⌉ or one more, which keeps this an upper bound.
pub fn r_search_limit(n: &Integer) -> u64 {
    let bits = u64::from(n.significant_bits());
    bits.saturating_pow(5).max(3)
}

/// Smallest r with gcd(r, n) = 1 and ord_r(n) > (log₂ n)², capped at
/// [`r_search_limit`].
pub fn find_r(n: &Integer) -> Result<u64> {
    find_r_bounded(n, r_search_limit(n))
}

/// [`find_r`] with an explicit cap on r. Fails if no r ≤ `limit` qualifies.
pub fn find_r_bounded(n: &Integer, limit: u64) -> Result<u64> {
    if *n <= 1u32 {
        bail!("find_r requires n > 1, got {}", n);
    }
    let log_n = log2(n);
    let threshold = log_n * log_n;

    for r in 2..=limit {
        let Some(order) = multiplicative_order(r, n) else {
            continue;
        };
        if order as f64 > threshold {
            debug!(r, order, threshold, "found r");
            return Ok(r);
        }
    }
    bail!(
        "no r <= {} with ord_r(n) > (log2 n)^2 = {:.3} for n = {}",
        limit,
        threshold,
        n
    )
}
