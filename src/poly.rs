//! # Poly — Arithmetic in Z[x]/(n, x^r − 1)
//!
//! Step 5 of AKS compares (x + a)^n with x^n + a in the quotient ring
//! Z[x]/(n, x^r − 1). Elements are stored densely as exactly r coefficients,
//! index = exponent, every coefficient reduced into [0, n). Ring operations
//! never mutate their inputs: each multiplication produces a fresh [`Poly`].
//!
//! ## Multiplication
//!
//! Schoolbook product with the exponent fold i + j → (i + j) mod r applied
//! on the fly. Products accumulate unreduced (`acc += a·b` maps to GMP's
//! `mpz_addmul`) and each slot is reduced mod n once at the end. Zero
//! coefficients are skipped, so multiplying by the two-term x + a costs O(r).
//!
//! ## Exponentiation
//!
//! Left-to-right binary exponentiation over the bits of the Integer exponent:
//! O(log n) ring multiplications, each O(r²) coefficient operations.
//!
//! ## Witness Loop
//!
//! For a = 1..=L with L = ⌊√φ(r) · log₂ n⌋, check (x + a)^n ≡ x^(n mod r) + a.
//! x^n is computed once and shared. Witnesses are independent, so the loop
//! runs on rayon workers; `find_first` keeps the reported counterexample
//! deterministic (the smallest failing a) while cancelling later work.
//!
//! ## References
//!
//! - M. Agrawal, N. Kayal, N. Saxena, "PRIMES is in P", Annals of Mathematics
//!   160(2):781–793, 2004.

use rayon::prelude::*;
use rug::Integer;
use tracing::debug;

use crate::arith::{log2, mod_u64};
use crate::progress::WitnessProgress;
use crate::totient::totient;

/// An element of Z[x]/(n, x^r − 1): `coeffs[e]` is the coefficient of x^e.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<Integer>,
}

impl Poly {
    pub fn coeffs(&self) -> &[Integer] {
        &self.coeffs
    }

    /// Coefficient of x^e, where `e < r`.
    pub fn coeff(&self, e: usize) -> &Integer {
        &self.coeffs[e]
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| *c == 0)
    }
}

/// The quotient ring Z[x]/(n, x^r − 1).
#[derive(Clone, Debug)]
pub struct PolyRing {
    r: usize,
    n: Integer,
}

impl PolyRing {
    /// Requires `r >= 1` and `n >= 1`.
    pub fn new(r: usize, n: Integer) -> Self {
        assert!(r >= 1, "ring degree r must be positive");
        assert!(n >= 1u32, "coefficient modulus n must be positive, got {}", n);
        PolyRing { r, n }
    }

    pub fn r(&self) -> usize {
        self.r
    }

    pub fn n(&self) -> &Integer {
        &self.n
    }

    fn reduce_coeff(&self, c: &Integer) -> Integer {
        Integer::from(c.rem_euc_ref(&self.n))
    }

    fn reduce_exp(&self, e: &Integer) -> usize {
        // r fits in usize, so the residue does too.
        mod_u64(e, self.r as u64) as usize
    }

    pub fn zero(&self) -> Poly {
        Poly {
            coeffs: vec![Integer::new(); self.r],
        }
    }

    /// The constant polynomial `a mod n`.
    pub fn constant(&self, a: &Integer) -> Poly {
        let mut p = self.zero();
        p.coeffs[0] = self.reduce_coeff(a);
        p
    }

    pub fn one(&self) -> Poly {
        self.constant(&Integer::from(1u32))
    }

    /// x^(e mod r). `e` must be non-negative.
    pub fn monomial(&self, e: &Integer) -> Poly {
        let mut p = self.zero();
        p.coeffs[self.reduce_exp(e)] = self.reduce_coeff(&Integer::from(1u32));
        p
    }

    /// x + a, reduced into the ring.
    pub fn x_plus(&self, a: &Integer) -> Poly {
        self.from_coeffs(&[a.clone(), Integer::from(1u32)])
    }

    /// Builds a ring element from `coeffs[e]` = coefficient of x^e for any
    /// length: exponents fold mod r with colliding terms added, and
    /// coefficients reduce into [0, n).
    pub fn from_coeffs(&self, coeffs: &[Integer]) -> Poly {
        let mut acc = vec![Integer::new(); self.r];
        for (e, c) in coeffs.iter().enumerate() {
            acc[e % self.r] += c;
        }
        Poly {
            coeffs: acc.iter().map(|c| self.reduce_coeff(c)).collect(),
        }
    }

    /// p + a. The constant lands on x^0 and is added to whatever is already
    /// there, so x^e + a with e ≡ 0 (mod r) becomes the constant 1 + a.
    pub fn add_constant(&self, p: &Poly, a: &Integer) -> Poly {
        debug_assert_eq!(p.coeffs.len(), self.r);
        let mut coeffs = p.coeffs.clone();
        coeffs[0] += a;
        coeffs[0] = self.reduce_coeff(&coeffs[0]);
        Poly { coeffs }
    }

    /// a · b in Z[x]/(n, x^r − 1).
    pub fn mul_mod(&self, a: &Poly, b: &Poly) -> Poly {
        assert_eq!(
            a.coeffs.len(),
            self.r,
            "left operand has {} coefficients, ring has r = {}",
            a.coeffs.len(),
            self.r
        );
        assert_eq!(
            b.coeffs.len(),
            self.r,
            "right operand has {} coefficients, ring has r = {}",
            b.coeffs.len(),
            self.r
        );
        let r = self.r;
        let mut acc = vec![Integer::new(); r];

        for (i, ai) in a.coeffs.iter().enumerate() {
            if *ai == 0 {
                continue;
            }
            for (j, bj) in b.coeffs.iter().enumerate() {
                if *bj == 0 {
                    continue;
                }
                let k = if i + j >= r { i + j - r } else { i + j };
                acc[k] += ai * bj;
            }
        }

        // Inputs are reduced and non-negative, so plain `%` lands in [0, n).
        for c in acc.iter_mut() {
            *c %= &self.n;
        }
        Poly { coeffs: acc }
    }

    /// base^exponent in Z[x]/(n, x^r − 1) by square-and-multiply.
    pub fn pow_mod(&self, base: &Poly, exponent: &Integer) -> Poly {
        assert!(*exponent >= 0, "negative exponent {} in pow_mod", exponent);
        assert_eq!(
            base.coeffs.len(),
            self.r,
            "base has {} coefficients, ring has r = {}",
            base.coeffs.len(),
            self.r
        );
        if *exponent == 0 {
            return self.one();
        }
        let bits = exponent.significant_bits();
        let mut result = base.clone();
        for i in (0..bits - 1).rev() {
            result = self.mul_mod(&result, &result);
            if exponent.get_bit(i) {
                result = self.mul_mod(&result, base);
            }
        }
        result
    }
}

/// a · b in Z[x]/(n, x^r − 1) without keeping a ring around.
pub fn mul_mod(a: &Poly, b: &Poly, r: usize, n: &Integer) -> Poly {
    PolyRing::new(r, n.clone()).mul_mod(a, b)
}

/// base^exponent in Z[x]/(n, x^r − 1) without keeping a ring around.
pub fn pow_mod(base: &Poly, exponent: &Integer, r: usize, n: &Integer) -> Poly {
    PolyRing::new(r, n.clone()).pow_mod(base, exponent)
}

/// L = ⌊√φ(r) · log₂ n⌋, the number of witnesses step 5 must check.
pub fn witness_bound(r: u64, n: &Integer) -> u64 {
    let phi = totient(r) as f64;
    (phi.sqrt() * log2(n)).floor() as u64
}

/// True iff (x + a)^n ≡ x^n + a in Z[x]/(n, x^r − 1) for every a in 1..=L.
pub fn check_poly_congruence(r: u64, n: &Integer) -> bool {
    find_failing_witness(r, n, true, None).is_none()
}

/// Smallest a in 1..=L for which (x + a)^n ≢ x^n + a, or `None` if every
/// witness passes. `progress`, when given, is bumped once per witness checked.
pub fn find_failing_witness(
    r: u64,
    n: &Integer,
    parallel: bool,
    progress: Option<&WitnessProgress>,
) -> Option<u64> {
    let r_size = usize::try_from(r).unwrap_or_else(|_| panic!("r = {} exceeds usize", r));
    let ring = PolyRing::new(r_size, n.clone());
    let bound = witness_bound(r, n);
    debug!(r, bound, parallel, "checking polynomial congruences");

    let x_n = ring.pow_mod(&ring.monomial(&Integer::from(1u32)), n);

    let fails = |a: u64| -> bool {
        let a = Integer::from(a);
        let lhs = ring.pow_mod(&ring.x_plus(&a), n);
        let rhs = ring.add_constant(&x_n, &a);
        if let Some(p) = progress {
            p.record();
        }
        lhs != rhs
    };

    if parallel {
        (1..=bound).into_par_iter().find_first(|&a| fails(a))
    } else {
        (1..=bound).find(|&a| fails(a))
    }
}
