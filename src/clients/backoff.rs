//! Retry-delay policies for rate-limit backoff.
//!
//! The pagination driver consults a [`Backoff`] whenever the API
//! reports `limit_reached`. Policies are pure delay functions: they
//! never sleep themselves and hold no retry state, so one instance can
//! serve any number of concurrent calls.

use std::time::Duration;

/// A retry-delay policy.
///
/// `retries` is the number of retries already performed for the current
/// page, starting at 0 for the first retry.
pub trait Backoff: Send + Sync {
    /// Returns how long to wait before the next retry.
    fn delay(&self, retries: u32) -> Duration;
}

impl<F> Backoff for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn delay(&self, retries: u32) -> Duration {
        self(retries)
    }
}

/// A policy that waits the same duration before every retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantBackoff(pub Duration);

impl Backoff for ConstantBackoff {
    fn delay(&self, _retries: u32) -> Duration {
        self.0
    }
}

/// A policy that waits `base^retries * unit` before each retry.
///
/// The first retry waits exactly `unit`. There is no upper cap; combine
/// with an outer timeout if an unbounded wait is unacceptable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialBackoff {
    /// The exponent base.
    pub base: f64,
    /// The delay of the first retry.
    pub unit: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            base: 2.0,
            unit: Duration::from_millis(500),
        }
    }
}

impl Backoff for ExponentialBackoff {
    fn delay(&self, retries: u32) -> Duration {
        let exp = i32::try_from(retries).unwrap_or(i32::MAX);
        self.unit.mul_f64(self.base.powi(exp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_backoff_ignores_retry_count() {
        let backoff = ConstantBackoff(Duration::from_secs(3));
        assert_eq!(backoff.delay(0), Duration::from_secs(3));
        assert_eq!(backoff.delay(1), Duration::from_secs(3));
        assert_eq!(backoff.delay(100), Duration::from_secs(3));
    }

    #[test]
    fn test_exponential_backoff_first_retry_waits_one_unit() {
        let backoff = ExponentialBackoff {
            base: 2.0,
            unit: Duration::from_secs(1),
        };
        assert_eq!(backoff.delay(0), Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_backoff_doubles_per_retry() {
        let backoff = ExponentialBackoff::default();
        assert_eq!(backoff.delay(0), Duration::from_millis(500));
        assert_eq!(backoff.delay(1), Duration::from_millis(1000));
        assert_eq!(backoff.delay(2), Duration::from_millis(2000));
        assert_eq!(backoff.delay(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_exponential_backoff_with_custom_base() {
        let backoff = ExponentialBackoff {
            base: 3.0,
            unit: Duration::from_millis(100),
        };
        assert_eq!(backoff.delay(2), Duration::from_millis(900));
    }

    #[test]
    fn test_closures_are_backoff_policies() {
        let backoff = |retries: u32| Duration::from_millis(u64::from(retries) * 10);
        assert_eq!(Backoff::delay(&backoff, 5), Duration::from_millis(50));
    }
}
