//! Retry observation and logging
//!
//! The `RetryObserver` trait is the single hook the executor calls before
//! every retry. `on_success`, `on_exhausted` and `on_rejected` are optional
//! extras with no-op defaults.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Observer trait for retry events
///
/// `on_retry` is called once per failed attempt that will be retried,
/// before the delay starts. It is never called for the final attempt.
/// Observers cannot abort the retry loop.
///
/// # Example
///
/// ```rust
/// use herald_core::retry::RetryObserver;
/// use std::time::Duration;
///
/// struct PrintObserver;
///
/// impl RetryObserver<std::io::Error> for PrintObserver {
///     fn on_retry(&self, error: &std::io::Error, attempt: u32, delay: Duration) {
///         eprintln!("attempt {} failed ({}), waiting {:?}", attempt, error, delay);
///     }
/// }
/// ```
pub trait RetryObserver<E: ?Sized>: Send + Sync {
    /// Called when an attempt fails and will be retried
    ///
    /// # Arguments
    ///
    /// * `error` - The error returned by the failed attempt
    /// * `attempt` - The attempt number that failed (1-indexed)
    /// * `delay` - The pause before the next attempt
    fn on_retry(&self, error: &E, attempt: u32, delay: Duration);

    /// Called when the operation succeeds
    fn on_success(&self, attempt: u32, total_duration: Duration) {
        let _ = (attempt, total_duration);
    }

    /// Called when the attempt budget is spent
    fn on_exhausted(&self, attempts: u32, final_error: &E) {
        let _ = (attempts, final_error);
    }

    /// Called when the predicate declines to retry an error
    fn on_rejected(&self, attempt: u32, error: &E) {
        let _ = (attempt, error);
    }
}

impl<E: ?Sized, T: RetryObserver<E> + ?Sized> RetryObserver<E> for Arc<T> {
    fn on_retry(&self, error: &E, attempt: u32, delay: Duration) {
        (**self).on_retry(error, attempt, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &E) {
        (**self).on_exhausted(attempts, final_error)
    }

    fn on_rejected(&self, attempt: u32, error: &E) {
        (**self).on_rejected(attempt, error)
    }
}

impl<E: ?Sized, T: RetryObserver<E> + ?Sized> RetryObserver<E> for Box<T> {
    fn on_retry(&self, error: &E, attempt: u32, delay: Duration) {
        (**self).on_retry(error, attempt, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &E) {
        (**self).on_exhausted(attempts, final_error)
    }

    fn on_rejected(&self, attempt: u32, error: &E) {
        (**self).on_rejected(attempt, error)
    }
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl<E: ?Sized> RetryObserver<E> for NoOpObserver {
    fn on_retry(&self, _error: &E, _attempt: u32, _delay: Duration) {}
}

/// Adapts a closure `Fn(&E, attempt)` into an observer
///
/// ```rust
/// use herald_core::retry::ObserverFn;
///
/// let observer = ObserverFn::new(|err: &String, attempt: u32| {
///     eprintln!("retry {} after {}", attempt, err);
/// });
/// # let _ = observer;
/// ```
pub struct ObserverFn<F> {
    callback: F,
}

impl<F> ObserverFn<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> fmt::Debug for ObserverFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverFn").finish_non_exhaustive()
    }
}

impl<E, F> RetryObserver<E> for ObserverFn<F>
where
    F: Fn(&E, u32) + Send + Sync,
{
    fn on_retry(&self, error: &E, attempt: u32, _delay: Duration) {
        (self.callback)(error, attempt)
    }
}

/// An observer that logs retry events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_retry`: WARN
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_exhausted`: ERROR
/// - `on_rejected`: WARN
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being retried (for log context)
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl<E: fmt::Display + ?Sized> RetryObserver<E> for TracingObserver {
    fn on_retry(&self, error: &E, attempt: u32, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, will retry"
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = total_duration.as_millis() as u64,
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &E) {
        tracing::error!(
            operation = %self.operation,
            attempts = attempts,
            error = %final_error,
            "all retry attempts exhausted"
        );
    }

    fn on_rejected(&self, attempt: u32, error: &E) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            "error is not retryable"
        );
    }
}

/// An observer that collects statistics about retry attempts
///
/// Records which attempts were retried and how long each pause was.
#[derive(Debug, Default)]
pub struct StatsObserver {
    retries: AtomicU32,
    successes: AtomicU32,
    exhaustions: AtomicU32,
    rejections: AtomicU32,
    history: Mutex<Vec<(u32, Duration)>>,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `on_retry` notifications
    pub fn retries(&self) -> u32 {
        self.retries.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    pub fn rejections(&self) -> u32 {
        self.rejections.load(Ordering::SeqCst)
    }

    /// Attempt numbers passed to `on_retry`, in call order
    pub fn retry_attempts(&self) -> Vec<u32> {
        self.history().iter().map(|(attempt, _)| *attempt).collect()
    }

    /// Delays passed to `on_retry`, in call order
    pub fn delays(&self) -> Vec<Duration> {
        self.history().iter().map(|(_, delay)| *delay).collect()
    }

    fn history(&self) -> std::sync::MutexGuard<'_, Vec<(u32, Duration)>> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<E: ?Sized> RetryObserver<E> for StatsObserver {
    fn on_retry(&self, _error: &E, attempt: u32, delay: Duration) {
        self.retries.fetch_add(1, Ordering::SeqCst);
        self.history().push((attempt, delay));
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _final_error: &E) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }

    fn on_rejected(&self, _attempt: u32, _error: &E) {
        self.rejections.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;
        RetryObserver::<str>::on_retry(&observer, "boom", 1, Duration::from_millis(100));
        RetryObserver::<str>::on_success(&observer, 1, Duration::from_millis(50));
        RetryObserver::<str>::on_exhausted(&observer, 3, "boom");
    }

    #[test]
    fn test_tracing_observer() {
        let observer = TracingObserver::new("test_operation");
        assert_eq!(observer.operation(), "test_operation");

        RetryObserver::<str>::on_retry(&observer, "boom", 1, Duration::from_millis(100));
        RetryObserver::<str>::on_success(&observer, 2, Duration::from_millis(150));
        RetryObserver::<str>::on_exhausted(&observer, 3, "boom");
        RetryObserver::<str>::on_rejected(&observer, 1, "fatal");
    }

    #[test]
    fn test_stats_observer_records_history() {
        let stats = StatsObserver::new();

        RetryObserver::<str>::on_retry(&stats, "a", 1, Duration::from_millis(1000));
        RetryObserver::<str>::on_retry(&stats, "b", 2, Duration::from_millis(2000));
        RetryObserver::<str>::on_success(&stats, 3, Duration::from_millis(3000));

        assert_eq!(stats.retries(), 2);
        assert_eq!(stats.successes(), 1);
        assert_eq!(stats.exhaustions(), 0);
        assert_eq!(stats.retry_attempts(), vec![1, 2]);
        assert_eq!(
            stats.delays(),
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[test]
    fn test_observer_fn_receives_error_and_attempt() {
        let seen = Mutex::new(Vec::new());
        let observer = ObserverFn::new(|err: &String, attempt: u32| {
            seen.lock().unwrap().push(format!("{}#{}", err, attempt));
        });

        observer.on_retry(&"timeout".to_string(), 1, Duration::ZERO);
        observer.on_retry(&"reset".to_string(), 2, Duration::ZERO);

        assert_eq!(*seen.lock().unwrap(), vec!["timeout#1", "reset#2"]);
    }

    #[test]
    fn test_arc_forwarding() {
        let stats = Arc::new(StatsObserver::new());
        let shared: Arc<StatsObserver> = Arc::clone(&stats);

        RetryObserver::<str>::on_retry(&shared, "x", 1, Duration::ZERO);
        assert_eq!(stats.retries(), 1);
    }
}
