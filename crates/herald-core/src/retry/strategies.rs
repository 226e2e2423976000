//! Retry delay strategies
//!
//! Computes the pause before each retry from the policy.

use crate::types::{RetryPolicy, RetryStrategy};
use rand::Rng;
use std::time::Duration;

/// Delay before jitter for a given retry
///
/// `retry_index` is 0 for the first retry (the pause between attempts 1
/// and 2). The result never exceeds `policy.max_delay_ms`.
///
/// # Example
///
/// ```rust
/// use herald_core::retry::base_delay;
/// use herald_core::types::RetryPolicy;
///
/// let policy = RetryPolicy {
///     initial_delay_ms: 1000,
///     max_delay_ms: 30000,
///     ..RetryPolicy::default()
/// };
///
/// assert_eq!(base_delay(&policy, 0).as_millis(), 1000);
/// assert_eq!(base_delay(&policy, 3).as_millis(), 8000);
/// ```
pub fn base_delay(policy: &RetryPolicy, retry_index: u32) -> Duration {
    let delay_ms = match policy.strategy {
        RetryStrategy::None => 0,

        RetryStrategy::FixedDelay => policy.initial_delay_ms,

        RetryStrategy::ExponentialBackoff => {
            let raw = policy.initial_delay_ms as f64
                * policy.backoff_multiplier.powf(f64::from(retry_index));
            if raw.is_nan() || raw <= 0.0 {
                0
            } else if raw >= policy.max_delay_ms as f64 {
                policy.max_delay_ms
            } else {
                raw as u64
            }
        }

        RetryStrategy::LinearBackoff => policy
            .initial_delay_ms
            .saturating_mul(u64::from(retry_index) + 1),
    };

    Duration::from_millis(delay_ms.min(policy.max_delay_ms))
}

/// Delay before a retry, jitter included
///
/// Adds a uniformly random `[0, jitter_ms]` to [`base_delay`] so concurrent
/// callers do not retry in lockstep. `RetryStrategy::None` never waits.
pub fn calculate_delay(policy: &RetryPolicy, retry_index: u32) -> Duration {
    let base = base_delay(policy, retry_index);

    if policy.jitter_ms == 0 || matches!(policy.strategy, RetryStrategy::None) {
        return base;
    }

    let jitter = rand::rng().random_range(0..=policy.jitter_ms);
    base.saturating_add(Duration::from_millis(jitter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(strategy: RetryStrategy) -> RetryPolicy {
        RetryPolicy {
            max_attempts: 5,
            strategy,
            backoff_multiplier: 2.0,
            initial_delay_ms: 1000,
            max_delay_ms: 30000,
            jitter_ms: 0,
        }
    }

    #[test]
    fn test_none_strategy() {
        let policy = RetryPolicy {
            jitter_ms: 200,
            ..policy(RetryStrategy::None)
        };

        for index in 0..3 {
            assert_eq!(calculate_delay(&policy, index), Duration::ZERO);
        }
    }

    #[test]
    fn test_fixed_strategy() {
        let policy = policy(RetryStrategy::FixedDelay);

        for index in 0..3 {
            assert_eq!(base_delay(&policy, index), Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_exponential_strategy() {
        let policy = policy(RetryStrategy::ExponentialBackoff);

        // 1000 * 2^index
        assert_eq!(base_delay(&policy, 0), Duration::from_millis(1000));
        assert_eq!(base_delay(&policy, 1), Duration::from_millis(2000));
        assert_eq!(base_delay(&policy, 2), Duration::from_millis(4000));
        assert_eq!(base_delay(&policy, 3), Duration::from_millis(8000));
        assert_eq!(base_delay(&policy, 4), Duration::from_millis(16000));
        // 32000 capped at 30000
        assert_eq!(base_delay(&policy, 5), Duration::from_millis(30000));
    }

    #[test]
    fn test_linear_strategy() {
        let policy = policy(RetryStrategy::LinearBackoff);

        assert_eq!(base_delay(&policy, 0), Duration::from_millis(1000));
        assert_eq!(base_delay(&policy, 1), Duration::from_millis(2000));
        assert_eq!(base_delay(&policy, 2), Duration::from_millis(3000));
    }

    #[test]
    fn test_huge_index_does_not_overflow() {
        let exponential = policy(RetryStrategy::ExponentialBackoff);
        assert_eq!(
            base_delay(&exponential, u32::MAX),
            Duration::from_millis(30000)
        );

        let linear = RetryPolicy {
            initial_delay_ms: u64::MAX,
            max_delay_ms: u64::MAX,
            ..policy(RetryStrategy::LinearBackoff)
        };
        assert_eq!(base_delay(&linear, 7), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_degenerate_multiplier_yields_zero() {
        let policy = RetryPolicy {
            backoff_multiplier: f64::NAN,
            ..policy(RetryStrategy::ExponentialBackoff)
        };
        assert_eq!(base_delay(&policy, 2), Duration::ZERO);
    }

    #[test]
    fn test_jitter_bounds() {
        let policy = RetryPolicy {
            jitter_ms: 200,
            ..policy(RetryStrategy::ExponentialBackoff)
        };

        for _ in 0..200 {
            let delay = calculate_delay(&policy, 0);
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(1200));
        }
    }

    #[test]
    fn test_fourth_retry_bound() {
        let policy = RetryPolicy {
            jitter_ms: 200,
            ..policy(RetryStrategy::ExponentialBackoff)
        };

        for _ in 0..100 {
            let ms = calculate_delay(&policy, 3).as_millis();
            assert!((8000..=8200).contains(&ms), "delay was {}ms", ms);
        }
    }
}
