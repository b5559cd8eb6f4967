//! # Progress — Atomic Witness Counters
//!
//! Thread-safe progress tracking for the step-5 witness loop, shared between
//! rayon workers and a background status reporter. Counters are atomics so
//! every worker can bump them without locking.
//!
//! ## Background Reporter
//!
//! A dedicated thread logs witnesses checked, total, rate and ETA every
//! `interval`. Between reports it parks; `stop()` unparks it, so a join
//! right after `stop()` returns as soon as the thread observes the flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

pub struct WitnessProgress {
    pub checked: AtomicU64,
    pub total: u64,
    label: String,
    start: Instant,
    shutdown: AtomicBool,
    reporter: Mutex<Option<thread::Thread>>,
}

impl WitnessProgress {
    /// `label` identifies the candidate in log lines; `total` is the witness bound.
    pub fn new(label: impl Into<String>, total: u64) -> Arc<Self> {
        Arc::new(WitnessProgress {
            checked: AtomicU64::new(0),
            total,
            label: label.into(),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
            reporter: Mutex::new(None),
        })
    }

    pub fn record(&self) {
        self.checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn start_reporter(self: &Arc<Self>, interval: Duration) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        let handle = thread::spawn(move || {
            let mut last_report = Instant::now();
            while !progress.shutdown.load(Ordering::Acquire) {
                // park_timeout may wake spuriously; only report on a full interval
                thread::park_timeout(interval.saturating_sub(last_report.elapsed()));
                if progress.shutdown.load(Ordering::Acquire) {
                    break;
                }
                if last_report.elapsed() >= interval {
                    progress.print_status();
                    last_report = Instant::now();
                }
            }
        });
        if let Ok(mut slot) = self.reporter.lock() {
            *slot = Some(handle.thread().clone());
        }
        handle
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let checked = self.checked.load(Ordering::Relaxed);
        let rate = if elapsed.as_secs_f64() > 0.0 {
            checked as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let remaining = self.total.saturating_sub(checked);
        let eta_secs = if rate > 0.0 {
            (remaining as f64 / rate) as u64
        } else {
            0
        };
        info!(
            n = %self.label,
            checked,
            total = self.total,
            rate = format_args!("{:.2}", rate),
            eta = format_args!("{:02}:{:02}:{:02}", eta_secs / 3600, (eta_secs % 3600) / 60, eta_secs % 60),
            "witness progress"
        );
    }

    /// Set the shutdown flag and wake the reporter, if one was started.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
        if let Ok(slot) = self.reporter.lock() {
            if let Some(reporter) = slot.as_ref() {
                reporter.unpark();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Tests for witness counters and the background reporter.
    //!
    //! The concurrent tests mirror production, where every rayon worker bumps
    //! `checked` once per witness.

    use super::*;

    // ── Initialization ──────────────────────────────────────────────

    #[test]
    fn counter_starts_at_zero() {
        let p = WitnessProgress::new("31", 26);
        assert_eq!(p.checked.load(Ordering::Relaxed), 0);
        assert_eq!(p.total, 26);
    }

    // ── Concurrent Increment Correctness ────────────────────────────

    /// 8 threads × 1000 records must total exactly 8000.
    #[test]
    fn concurrent_records_are_accurate() {
        let p = WitnessProgress::new("n", 8000);
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&p);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        p.record();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(p.checked.load(Ordering::Relaxed), 8000);
    }

    // ── Reporter Lifecycle ─────────────────────────────────────────

    #[test]
    fn reporter_exits_after_stop() {
        let p = WitnessProgress::new("n", 10);
        let handle = p.start_reporter(Duration::from_millis(50));
        thread::sleep(Duration::from_millis(120));
        p.stop();
        handle.join().unwrap();
        assert!(p.shutdown.load(Ordering::Relaxed));
    }

    /// A reporter parked on a long interval must exit as soon as it is stopped.
    #[test]
    fn stop_wakes_parked_reporter_immediately() {
        let p = WitnessProgress::new("n", 10);
        let handle = p.start_reporter(Duration::from_secs(60));
        thread::sleep(Duration::from_millis(10));
        let stopped_at = Instant::now();
        p.stop();
        handle.join().unwrap();
        assert!(
            stopped_at.elapsed() < Duration::from_millis(50),
            "join took {:?}",
            stopped_at.elapsed()
        );
    }

    #[test]
    fn stop_before_reporter_parks_still_exits() {
        let p = WitnessProgress::new("n", 10);
        let handle = p.start_reporter(Duration::from_secs(60));
        p.stop();
        handle.join().unwrap();
        assert!(p.shutdown.load(Ordering::Relaxed));
    }

    #[test]
    fn multiple_stops_are_idempotent() {
        let p = WitnessProgress::new("n", 1);
        p.stop();
        p.stop();
        assert!(p.shutdown.load(Ordering::Relaxed));
    }

    // ── Edge Cases ────────────────────────────────────────────────

    /// Zero elapsed time and a finished count must not divide by zero.
    #[test]
    fn print_status_edge_cases() {
        let p = WitnessProgress::new("n", 0);
        p.print_status();
        p.record();
        p.print_status();
    }
}
