//! Property-based tests for the AKS engine's mathematical primitives.
//!
//! These tests use the `proptest` framework to verify invariants across
//! randomly generated inputs rather than fixed examples.
//!
//! # How to run
//!
//! ```bash
//! # Run all property tests:
//! cargo test --test property_tests
//!
//! # Run a specific property:
//! cargo test --test property_tests prop_root_rem_matches_gmp
//!
//! # Increase case count for thorough testing (default is 256):
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```
//!
//! # Testing strategy
//!
//! Properties are organized by module:
//! - **Substrate**: exact roots against GMP, modular exponentiation, log2
//! - **Perfect powers**: every a^b is detected, primes never are
//! - **Order / totient**: defining properties of ord_r(n) and φ
//! - **Quotient ring**: commutativity, associativity, distributivity of
//!   `mul_mod`, and `pow_mod` as repeated multiplication
//! - **End to end**: the engine agrees with an independent primality oracle
//!
//! Each property is named `prop_<function>_<invariant>`.

use aks::arith::{log2, pow_mod, root_rem};
use aks::order::{find_r, multiplicative_order};
use aks::perfect_power::is_perfect_power;
use aks::poly::{mul_mod, Poly, PolyRing};
use aks::totient::totient;
use aks::{Aks, AksConfig, Verdict};
use proptest::prelude::*;
use rug::integer::IsPrime;
use rug::ops::Pow;
use rug::Integer;

fn naive_gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn naive_is_prime(n: u64) -> bool {
    n >= 2 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

fn poly_strategy(r: usize, n: u64) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0..n, r)
}

fn to_poly(ring: &PolyRing, coeffs: &[u64]) -> Poly {
    let ints: Vec<Integer> = coeffs.iter().map(|&c| Integer::from(c)).collect();
    ring.from_coeffs(&ints)
}

// == Substrate Properties ======================================================

proptest! {
    /// root_rem(n, b) agrees with GMP's mpz_rootrem for numbers up to ~600 bits.
    #[test]
    fn prop_root_rem_matches_gmp(
        limbs in prop::collection::vec(any::<u64>(), 1..10),
        b in 2u32..40,
    ) {
        let mut n = Integer::new();
        for limb in &limbs {
            n = (n << 64u32) + *limb;
        }
        let (ours, exact) = root_rem(&n, b);
        let (gmp_root, gmp_rem) = n.clone().root_rem(Integer::new(), b);
        prop_assert_eq!(&ours, &gmp_root);
        prop_assert_eq!(exact, gmp_rem == 0);
    }

    /// a = floor(n^(1/b)) means a^b <= n < (a+1)^b.
    #[test]
    fn prop_root_rem_brackets_n(n in 1u64..u64::MAX, b in 2u32..64) {
        let n = Integer::from(n);
        let (a, _) = root_rem(&n, b);
        prop_assert!(Integer::from((&a).pow(b)) <= n);
        prop_assert!(Integer::from(&a + 1u32).pow(b) > n);
    }

    /// pow_mod agrees with GMP on word-sized inputs.
    #[test]
    fn prop_pow_mod_matches_gmp(base in 0u64..1_000_000, exp in 0u64..1000, m in 1u64..1_000_000) {
        let ours = pow_mod(&Integer::from(base), &Integer::from(exp), &Integer::from(m));
        let expected = Integer::from(base)
            .pow_mod(&Integer::from(exp), &Integer::from(m))
            .unwrap();
        prop_assert_eq!(ours, expected);
    }

    /// log2 of a shifted value shifts by exactly the shift amount.
    #[test]
    fn prop_log2_shift_is_additive(v in 1u64..u64::MAX, shift in 0u32..4000) {
        let base = Integer::from(v);
        let shifted = Integer::from(&base << shift);
        prop_assert!((log2(&shifted) - log2(&base) - shift as f64).abs() < 1e-6);
    }
}

// == Perfect Power Properties ==================================================

proptest! {
    /// Every a^b with a, b >= 2 is a perfect power, up to 10^300 and beyond.
    #[test]
    fn prop_perfect_power_detects_every_power(a in 2u64..1_000_000_000, b in 2u32..40) {
        let n = Integer::from(a).pow(b);
        prop_assert!(is_perfect_power(&n), "missed {}^{}", a, b);
    }

    #[test]
    fn prop_perfect_power_detects_huge_powers(a in 2u64..1000, extra in 0u64..1_000_000) {
        // (10^60 + extra + a)^5 is well beyond 10^300
        let base = Integer::from(10u32).pow(60) + extra + a;
        let n = Integer::from((&base).pow(5u32));
        prop_assert!(is_perfect_power(&n));
        // Catalan: base^5 + 1 is never a perfect power
        prop_assert!(!is_perfect_power(&Integer::from(&n + 1u32)));
    }

    /// Primes are never perfect powers.
    #[test]
    fn prop_perfect_power_rejects_primes(seed in 2u64..u64::MAX / 2) {
        let p = Integer::from(seed).next_prime();
        prop_assert!(!is_perfect_power(&p));
    }
}

// == Order and Totient Properties ==============================================

proptest! {
    /// ord_r(n) is the least k with n^k = 1 (mod r); None iff gcd(r, n) != 1.
    #[test]
    fn prop_order_is_least_exponent(r in 2u64..2000, n in 2u64..1_000_000) {
        let n_int = Integer::from(n);
        match multiplicative_order(r, &n_int) {
            None => prop_assert_ne!(naive_gcd(r, n), 1),
            Some(k) => {
                prop_assert_eq!(naive_gcd(r, n), 1);
                let r_int = Integer::from(r);
                prop_assert_eq!(pow_mod(&n_int, &Integer::from(k), &r_int), 1);
                for j in 1..k {
                    prop_assert_ne!(pow_mod(&n_int, &Integer::from(j), &r_int), 1);
                }
            }
        }
    }

    /// find_r returns the minimal coprime r whose order exceeds (log2 n)^2.
    #[test]
    fn prop_find_r_is_minimal(n in 2u64..100_000) {
        let n_int = Integer::from(n);
        let r = find_r(&n_int).unwrap();
        let log_n = log2(&n_int);
        let threshold = log_n * log_n;
        prop_assert!(multiplicative_order(r, &n_int).unwrap() as f64 > threshold);
        for s in 2..r {
            if let Some(k) = multiplicative_order(s, &n_int) {
                prop_assert!(k as f64 <= threshold, "smaller r = {} qualifies", s);
            }
        }
    }

    /// φ(p) = p - 1 and φ(pq) = (p - 1)(q - 1).
    #[test]
    fn prop_totient_primes_and_semiprimes(i in 0usize..200, j in 0usize..200) {
        let primes: Vec<u64> = (2u64..2000).filter(|&k| naive_is_prime(k)).collect();
        let p = primes[i % primes.len()];
        let q = primes[j % primes.len()];
        prop_assert_eq!(totient(p), p - 1);
        if p != q {
            prop_assert_eq!(totient(p * q), (p - 1) * (q - 1));
        }
    }

    /// φ(n) matches a direct count of coprime residues.
    #[test]
    fn prop_totient_matches_count(n in 1u64..3000) {
        let count = (1..=n).filter(|&k| naive_gcd(k, n) == 1).count() as u64;
        prop_assert_eq!(totient(n), count);
    }
}

// == Quotient Ring Properties ==================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// (a·b)·c = a·(b·c) and a·b = b·a in Z[x]/(n, x^r - 1).
    #[test]
    fn prop_mul_mod_associative_and_commutative(
        (r, n, a, b, c) in (1usize..12, 2u64..10_000).prop_flat_map(|(r, n)| {
            (Just(r), Just(n), poly_strategy(r, n), poly_strategy(r, n), poly_strategy(r, n))
        })
    ) {
        let ring = PolyRing::new(r, Integer::from(n));
        let (a, b, c) = (to_poly(&ring, &a), to_poly(&ring, &b), to_poly(&ring, &c));
        prop_assert_eq!(ring.mul_mod(&ring.mul_mod(&a, &b), &c), ring.mul_mod(&a, &ring.mul_mod(&b, &c)));
        prop_assert_eq!(ring.mul_mod(&a, &b), ring.mul_mod(&b, &a));
        prop_assert_eq!(mul_mod(&a, &b, r, &Integer::from(n)), ring.mul_mod(&a, &b));
    }

    /// a·(b + k) = a·b + a·k for a constant k.
    #[test]
    fn prop_mul_mod_distributes_over_constants(
        (r, n, a, b) in (1usize..12, 2u64..10_000).prop_flat_map(|(r, n)| {
            (Just(r), Just(n), poly_strategy(r, n), poly_strategy(r, n))
        }),
        k in 0u64..10_000,
    ) {
        let ring = PolyRing::new(r, Integer::from(n));
        let (a, b) = (to_poly(&ring, &a), to_poly(&ring, &b));
        let k = Integer::from(k);
        let lhs = ring.mul_mod(&a, &ring.add_constant(&b, &k));
        let ab = ring.mul_mod(&a, &b);
        let ak = ring.mul_mod(&a, &ring.constant(&k));
        let mut sum: Vec<Integer> = ab.coeffs().to_vec();
        for (s, t) in sum.iter_mut().zip(ak.coeffs()) {
            *s += t;
        }
        prop_assert_eq!(lhs, ring.from_coeffs(&sum));
    }

    /// pow_mod(p, e) equals e-fold multiplication.
    #[test]
    fn prop_pow_mod_is_repeated_multiplication(
        (r, n, p) in (1usize..10, 2u64..1000).prop_flat_map(|(r, n)| {
            (Just(r), Just(n), poly_strategy(r, n))
        }),
        e in 0u32..40,
    ) {
        let ring = PolyRing::new(r, Integer::from(n));
        let p = to_poly(&ring, &p);
        let mut expected = ring.one();
        for _ in 0..e {
            expected = ring.mul_mod(&expected, &p);
        }
        prop_assert_eq!(ring.pow_mod(&p, &Integer::from(e)), expected);
    }
}

// == End-to-End Properties =====================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The deterministic verdict matches GMP's primality oracle.
    #[test]
    fn prop_aks_agrees_with_oracle(n in 2u64..400) {
        let aks = Aks::new(AksConfig { progress_interval_secs: 0, ..AksConfig::default() });
        let verdict = aks.test(&Integer::from(n)).unwrap();
        let oracle = Integer::from(n).is_probably_prime(30) != IsPrime::No;
        prop_assert_eq!(verdict == Verdict::Prime, oracle, "n = {}", n);
        prop_assert_eq!(oracle, naive_is_prime(n));
    }
}
