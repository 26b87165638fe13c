//! Pure retry-backoff policy (spec §4.1, §7, §9).
//!
//! The retry *decision* (is this error kind retryable, how many attempts
//! are left) is a pure function of `(error_kind, attempt)`; only the sleep
//! itself is a side effect, and it lives in [`crate::orchestrator`], which
//! owns the attempt loop and the telemetry it emits.

use rand::Rng;
use std::time::Duration;

/// Default values from spec §7: base 250ms, factor 2, jitter ±20%, 3 attempts.
pub const DEFAULT_BASE: Duration = Duration::from_millis(250);
pub const DEFAULT_FACTOR: f64 = 2.0;
pub const DEFAULT_JITTER_PCT: f64 = 0.2;
pub const MAX_ATTEMPTS: u32 = 3;

/// Compute the exponential backoff delay for a given (zero-based) retry
/// attempt, with `±jitter_pct` uniform jitter applied around the computed
/// exponential delay.
#[must_use]
pub fn backoff(attempt: u32, base: Duration, factor: f64, jitter_pct: f64) -> Duration {
    backoff_with_rng(attempt, base, factor, jitter_pct, &mut rand::thread_rng())
}

/// Same as [`backoff`] but takes an explicit RNG, so the jitter is
/// deterministically testable.
#[must_use]
pub fn backoff_with_rng(
    attempt: u32,
    base: Duration,
    factor: f64,
    jitter_pct: f64,
    rng: &mut impl Rng,
) -> Duration {
    let exp = base.as_secs_f64() * factor.powi(attempt as i32);
    let jitter = exp * jitter_pct;
    let delta = if jitter > 0.0 {
        rng.gen_range(-jitter..=jitter)
    } else {
        0.0
    };
    Duration::from_secs_f64((exp + delta).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_exponentially_without_jitter() {
        let d0 = backoff(0, DEFAULT_BASE, DEFAULT_FACTOR, 0.0);
        let d1 = backoff(1, DEFAULT_BASE, DEFAULT_FACTOR, 0.0);
        let d2 = backoff(2, DEFAULT_BASE, DEFAULT_FACTOR, 0.0);
        assert_eq!(d0, Duration::from_millis(250));
        assert_eq!(d1, Duration::from_millis(500));
        assert_eq!(d2, Duration::from_millis(1000));
    }

    #[test]
    fn test_backoff_jitter_stays_within_bounds() {
        let mut rng = rand::thread_rng();
        for attempt in 0..3 {
            let exp = DEFAULT_BASE.as_secs_f64() * DEFAULT_FACTOR.powi(attempt);
            let lo = exp * (1.0 - DEFAULT_JITTER_PCT);
            let hi = exp * (1.0 + DEFAULT_JITTER_PCT);
            let d = backoff_with_rng(attempt as u32, DEFAULT_BASE, DEFAULT_FACTOR, DEFAULT_JITTER_PCT, &mut rng);
            let secs = d.as_secs_f64();
            assert!(secs >= lo - 0.001 && secs <= hi + 0.001, "attempt {attempt}: {secs} not in [{lo}, {hi}]");
        }
    }

    #[test]
    fn test_backoff_never_negative() {
        let d = backoff(0, Duration::from_millis(1), 2.0, 5.0);
        assert!(d.as_secs_f64() >= 0.0);
    }
}
