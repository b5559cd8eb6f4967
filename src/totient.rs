//! Euler's totient by trial division, used to size the step-5 witness loop.

/// Distinct prime factors of `n` in ascending order.
pub fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut p = 2u64;
    while p <= n / p {
        if n.is_multiple_of(p) {
            while n.is_multiple_of(p) {
                n /= p;
            }
            factors.push(p);
        }
        p += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// φ(n): the number of integers in [1, n] coprime to `n`.
///
/// Starts from `n` and applies `result -= result / p` once per distinct prime
/// factor. `totient(0)` is 0.
pub fn totient(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    prime_factors(n)
        .into_iter()
        .fold(n, |result, p| result - result / p)
}
