//! # Arith — Exact Integer Substrate
//!
//! Arbitrary-precision arithmetic underpinning every AKS step. `rug::Integer`
//! (GMP, little-endian limb arrays) supplies add, sub, mul, truncating div-rem,
//! pow and comparison; this module adds the operations the engine relies on
//! that must be exact:
//!
//! 1. **Integer b-th root with remainder** (`root_rem`) by Newton iteration on
//!    integers. No floating point or fixed-precision decimal is involved, so
//!    borderline perfect powers such as (10^100 + 1)^3 are classified correctly.
//! 2. **Modular exponentiation** (`pow_mod`) for Integer base, exponent and
//!    modulus.
//! 3. **Word-sized reductions** (`mod_u64`, `gcd_u64`) used when r fits in a
//!    machine word.
//! 4. **Bit-accurate log2** (`log2`) valid past 2^1024, where converting to
//!    `f64` would overflow to infinity.
//!
//! ## Algorithm: Integer Newton Root
//!
//! For n ≥ 1 and b ≥ 2 the iteration x ← ((b−1)·x + ⌊n / x^(b−1)⌋) / b is
//! monotonically decreasing once x ≥ ⌊n^(1/b)⌋, and stops exactly at the floor
//! root. The seed 2^⌈bits(n)/b⌉ is always above the true root.
//!
//! ## References
//!
//! - R. Crandall, C. Pomerance, "Prime Numbers: A Computational Perspective",
//!   2nd ed., Algorithm 9.2.11 (integer power root).

use rug::ops::Pow;
use rug::Integer;

/// Floor b-th root of `n` together with an exactness flag.
///
/// Returns `(a, exact)` where `a = ⌊n^(1/b)⌋` and `exact` is true iff `a^b == n`.
/// `n` must be non-negative and `b` at least 1.
pub fn root_rem(n: &Integer, b: u32) -> (Integer, bool) {
    assert!(*n >= 0, "root_rem requires a non-negative radicand, got {}", n);
    assert!(b >= 1, "root_rem requires a positive degree");

    if b == 1 || *n <= 1u32 {
        return (n.clone(), true);
    }

    let bits = n.significant_bits();
    let seed_bits = bits.div_ceil(b);
    let mut x = Integer::from(1u32) << seed_bits;
    let b_minus_1 = b - 1;

    loop {
        // y = ((b-1)*x + n / x^(b-1)) / b
        let x_pow = Integer::from((&x).pow(b_minus_1));
        let mut y = Integer::from(n / &x_pow);
        y += Integer::from(&x * b_minus_1);
        y /= b;
        if y >= x {
            break;
        }
        x = y;
    }

    let exact = Integer::from((&x).pow(b)) == *n;
    (x, exact)
}

/// Modular exponentiation: base^exp mod modulus, result in [0, modulus).
///
/// `modulus` must be positive and `exp` non-negative.
pub fn pow_mod(base: &Integer, exp: &Integer, modulus: &Integer) -> Integer {
    assert!(*modulus > 0, "pow_mod requires a positive modulus");
    assert!(*exp >= 0, "pow_mod requires a non-negative exponent");
    if *modulus == 1u32 {
        return Integer::new();
    }
    let base = Integer::from(base.rem_euc_ref(modulus));
    // Non-negative exponent and positive modulus never hit the inverse path.
    match base.pow_mod(exp, modulus) {
        Ok(r) => r,
        Err(_) => unreachable!("pow_mod with non-negative exponent cannot fail"),
    }
}

/// Residue of a non-negative `n` modulo the machine word `m` (m > 0).
pub fn mod_u64(n: &Integer, m: u64) -> u64 {
    assert!(m > 0, "mod_u64 requires a positive modulus");
    let rem = Integer::from(n.rem_euc_ref(&Integer::from(m)));
    rem.to_u64()
        .unwrap_or_else(|| unreachable!("residue below a u64 modulus fits in u64"))
}

/// gcd(n, m) for a big `n` and a machine word `m`.
pub fn gcd_u64(n: &Integer, m: u64) -> u64 {
    if m == 0 {
        return n
            .clone()
            .abs()
            .to_u64()
            .unwrap_or_else(|| panic!("gcd({}, 0) does not fit in u64", n));
    }
    let mut a = mod_u64(&n.clone().abs(), m);
    let mut b = m;
    while a != 0 {
        let t = b % a;
        b = a;
        a = t;
    }
    b
}

/// log₂(n) for positive `n`, accurate to f64 precision at any size.
///
/// Takes the top 53 significant bits as a mantissa and adds the shifted-out
/// bit count, so the result stays finite for integers beyond 2^1024.
pub fn log2(n: &Integer) -> f64 {
    assert!(*n > 0, "log2 requires a positive argument, got {}", n);
    let bits = n.significant_bits();
    if bits <= 53 {
        return n.to_f64().log2();
    }
    let shift = bits - 53;
    let top = Integer::from(n >> shift);
    top.to_f64().log2() + shift as f64
}
