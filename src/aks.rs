//! # AKS — Deterministic Primality Orchestrator
//!
//! Runs the AKS state machine over an arbitrary-precision candidate:
//!
//! ```text
//! Start → PerfectPowerCheck → SmallFactorCheck → TrivialPrimeCheck → PolyWitnessCheck
//!              │                     │                   │                  │
//!          Composite             Composite             Prime        Prime | Composite
//! ```
//!
//! 1. n ≤ 1 is rejected as invalid input (not a verdict).
//! 2. n = a^b with b > 1 ⇒ Composite.
//! 3. r = smallest modulus with ord_r(n) > (log₂ n)²; any a in 2..=min(r, n−1)
//!    dividing n ⇒ Composite.
//! 4. n ≤ r ⇒ Prime.
//! 5. (x + a)^n ≡ x^n + a in Z[x]/(n, x^r − 1) for all a ≤ ⌊√φ(r) · log₂ n⌋
//!    ⇒ Prime, otherwise Composite.
//!
//! No state is revisited and each step terminates, so every run ends in a
//! verdict or an error. The answer carries no probabilistic error.

use anyhow::{bail, Result};
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};

use crate::config::AksConfig;
use crate::order::{find_r_bounded, multiplicative_order, r_search_limit};
use crate::perfect_power::perfect_power_decomposition;
use crate::poly::{find_failing_witness, witness_bound};
use crate::progress::WitnessProgress;
use crate::totient::totient;

/// Final answer of the test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Prime,
    Composite,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Prime => write!(f, "Prime"),
            Verdict::Composite => write!(f, "Composite"),
        }
    }
}

/// The state that produced the verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PerfectPowerCheck,
    SmallFactorCheck,
    TrivialPrimeCheck,
    PolyWitnessCheck,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::PerfectPowerCheck => write!(f, "perfect power check"),
            Step::SmallFactorCheck => write!(f, "small factor check"),
            Step::TrivialPrimeCheck => write!(f, "trivial prime check"),
            Step::PolyWitnessCheck => write!(f, "polynomial witness check"),
        }
    }
}

/// Perfect power decomposition; the base is a decimal string for JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerWitness {
    pub base: String,
    pub exponent: u32,
}

/// Everything a run learned on the way to its verdict.
///
/// Fields for steps the run never reached stay `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AksReport {
    pub n: String,
    pub verdict: Verdict,
    pub decided_by: Step,
    pub perfect_power: Option<PowerWitness>,
    pub r: Option<u64>,
    pub order: Option<u64>,
    pub small_factor: Option<u64>,
    pub totient_r: Option<u64>,
    pub witness_bound: Option<u64>,
    pub failing_witness: Option<u64>,
    pub elapsed_ms: u64,
}

impl AksReport {
    fn new(n: &Integer) -> Self {
        AksReport {
            n: n.to_string(),
            verdict: Verdict::Composite,
            decided_by: Step::PerfectPowerCheck,
            perfect_power: None,
            r: None,
            order: None,
            small_factor: None,
            totient_r: None,
            witness_bound: None,
            failing_witness: None,
            elapsed_ms: 0,
        }
    }

    fn finish(mut self, verdict: Verdict, step: Step, start: Instant) -> Self {
        self.verdict = verdict;
        self.decided_by = step;
        self.elapsed_ms = start.elapsed().as_millis() as u64;
        self
    }
}

/// AKS engine configured by [`AksConfig`].
#[derive(Debug, Clone, Default)]
pub struct Aks {
    config: AksConfig,
}

impl Aks {
    pub fn new(config: AksConfig) -> Self {
        Aks { config }
    }

    pub fn config(&self) -> &AksConfig {
        &self.config
    }

    /// Run every step on `n` and report how the verdict was reached.
    ///
    /// Fails when n ≤ 1 or when no r exists below the configured search cap.
    pub fn run(&self, n: &Integer) -> Result<AksReport> {
        if *n <= 1u32 {
            bail!("AKS requires an integer greater than 1, got {}", n);
        }
        let _span = info_span!("aks", bits = n.significant_bits()).entered();
        let start = Instant::now();
        let mut report = AksReport::new(n);

        // Step 1: perfect power
        if let Some((base, exponent)) = perfect_power_decomposition(n) {
            debug!(base = %base, exponent, "perfect power");
            report.perfect_power = Some(PowerWitness {
                base: base.to_string(),
                exponent,
            });
            return Ok(report.finish(Verdict::Composite, Step::PerfectPowerCheck, start));
        }

        // Step 2: r
        let limit = self.config.r_search_limit.unwrap_or_else(|| r_search_limit(n));
        let r = find_r_bounded(n, limit)?;
        report.r = Some(r);
        report.order = multiplicative_order(r, n);
        debug!(r, order = ?report.order, "selected modulus");

        // Step 3: small factors up to min(r, n - 1)
        let upper = match n.to_u64() {
            Some(n_word) => r.min(n_word - 1),
            None => r,
        };
        if let Some(a) = (2..=upper).find(|&a| n.is_divisible(&Integer::from(a))) {
            debug!(factor = a, "small factor");
            report.small_factor = Some(a);
            return Ok(report.finish(Verdict::Composite, Step::SmallFactorCheck, start));
        }

        // Step 4: n <= r
        if *n <= r {
            return Ok(report.finish(Verdict::Prime, Step::TrivialPrimeCheck, start));
        }

        // Step 5: polynomial congruences
        let bound = witness_bound(r, n);
        report.totient_r = Some(totient(r));
        report.witness_bound = Some(bound);
        info!(r, witnesses = bound, "begin polynomial congruence test");

        let progress = WitnessProgress::new(n.to_string(), bound);
        let reporter = (self.config.progress_interval_secs > 0).then(|| {
            progress.start_reporter(Duration::from_secs(self.config.progress_interval_secs))
        });
        let failing = find_failing_witness(r, n, self.config.parallel, Some(&*progress));
        progress.stop();
        if let Some(handle) = reporter {
            if handle.join().is_err() {
                warn!("witness progress reporter panicked");
            }
        }

        report.failing_witness = failing;
        let verdict = match failing {
            Some(a) => {
                debug!(witness = a, "congruence fails");
                Verdict::Composite
            }
            None => Verdict::Prime,
        };
        Ok(report.finish(verdict, Step::PolyWitnessCheck, start))
    }

    /// Verdict only.
    pub fn test(&self, n: &Integer) -> Result<Verdict> {
        self.run(n).map(|report| report.verdict)
    }
}

/// Decide whether `n` is prime with the default configuration, minus the
/// progress reporter thread.
///
/// Precondition n > 1; violating it is reported as an error.
pub fn test_primality(n: &Integer) -> Result<Verdict> {
    Aks::new(AksConfig {
        progress_interval_secs: 0,
        ..AksConfig::default()
    })
    .test(n)
}
