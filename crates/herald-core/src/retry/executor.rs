//! Retry execution engine
//!
//! This module provides the core retry loop with configurable policies,
//! predicates, and observers.

use std::future::Future;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::types::RetryPolicy;

use super::classify::{AlwaysRetry, RetryPredicate};
use super::error::RetryError;
use super::observer::{NoOpObserver, RetryObserver};
use super::strategies::calculate_delay;

/// Execute an async operation with retry logic based on a policy
///
/// This is a convenience function for simple retry scenarios. For more
/// control, use `RetryExecutorBuilder`.
///
/// # Example
///
/// ```rust,no_run
/// use herald_core::retry::retry_with_policy;
/// use herald_core::types::RetryPolicy;
///
/// async fn example() {
///     let policy = RetryPolicy::default();
///
///     let result = retry_with_policy(&policy, || async {
///         Ok::<_, std::io::Error>("success")
///     }).await;
/// }
/// ```
pub async fn retry_with_policy<F, Fut, T, E>(policy: &RetryPolicy, op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryExecutor::new(policy.clone()).execute(op).await
}

/// Builder for configuring a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use herald_core::retry::{RetryExecutorBuilder, TracingObserver};
/// use herald_core::types::RetryPolicy;
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_observer(TracingObserver::new("publish"))
///     .build();
/// ```
pub struct RetryExecutorBuilder<P = AlwaysRetry, O = NoOpObserver> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
}

impl Default for RetryExecutorBuilder<AlwaysRetry, NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder<AlwaysRetry, NoOpObserver> {
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            predicate: AlwaysRetry,
            observer: NoOpObserver,
        }
    }
}

impl<P, O> RetryExecutorBuilder<P, O> {
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the retry predicate
    ///
    /// Errors the predicate rejects are returned immediately.
    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutorBuilder<P2, O> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate,
            observer: self.observer,
        }
    }

    /// Set the observer notified before every retry
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<P, O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate: self.predicate,
            observer,
        }
    }

    pub fn build(self) -> RetryExecutor<P, O> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer: self.observer,
        }
    }
}

/// Retry executor
///
/// Runs an operation up to `policy.max_attempts` times. The operation is a
/// closure producing a fresh future per attempt, so any per-attempt state
/// (signatures, nonces, request bodies) is rebuilt every time.
pub struct RetryExecutor<P = AlwaysRetry, O = NoOpObserver> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
}

impl RetryExecutor<AlwaysRetry, NoOpObserver> {
    /// Executor that retries every error and observes nothing
    pub fn new(policy: RetryPolicy) -> Self {
        RetryExecutorBuilder::new().with_policy(policy).build()
    }
}

impl<P, O> RetryExecutor<P, O> {
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Execute an operation with retry logic
    ///
    /// Returns the first successful value. When attempts run out, or the
    /// predicate rejects an error, the last error is returned unchanged as
    /// [`RetryError::Operation`]. A policy with `max_attempts == 0` fails with
    /// [`RetryError::InvalidPolicy`] without invoking the operation.
    pub async fn execute<F, Fut, T, E>(&self, op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: RetryPredicate<E>,
        O: RetryObserver<E>,
    {
        self.run(op, None).await
    }

    /// Execute with retry logic, stopping early when `token` is cancelled
    ///
    /// Cancellation interrupts both an in-flight attempt and the pause
    /// between attempts.
    pub async fn execute_cancellable<F, Fut, T, E>(
        &self,
        op: F,
        token: &CancellationToken,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: RetryPredicate<E>,
        O: RetryObserver<E>,
    {
        self.run(op, Some(token)).await
    }

    async fn run<F, Fut, T, E>(
        &self,
        mut op: F,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: RetryPredicate<E>,
        O: RetryObserver<E>,
    {
        let max_attempts = self.policy.max_attempts;
        if max_attempts == 0 {
            return Err(RetryError::invalid_policy(
                "max_attempts must be at least 1",
            ));
        }

        let start = Instant::now();
        let mut last_error: Option<E> = None;
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(RetryError::cancelled(attempt, last_error));
            }

            attempt += 1;

            let outcome = match cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            return Err(RetryError::cancelled(attempt, last_error));
                        }
                        outcome = op() => outcome,
                    }
                }
                None => op().await,
            };

            let error = match outcome {
                Ok(value) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(value);
                }
                Err(error) => error,
            };

            if attempt >= max_attempts {
                self.observer.on_exhausted(attempt, &error);
                return Err(RetryError::Operation(error));
            }

            if !self.predicate.should_retry(&error) {
                self.observer.on_rejected(attempt, &error);
                return Err(RetryError::Operation(error));
            }

            let delay = calculate_delay(&self.policy, attempt - 1);
            self.observer.on_retry(&error, attempt, delay);

            match cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            return Err(RetryError::cancelled(attempt, Some(error)));
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }

            last_error = Some(error);
        }
    }
}
