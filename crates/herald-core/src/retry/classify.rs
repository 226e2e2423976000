//! Deciding which failures earn another attempt
//!
//! The executor asks its classifier after every failed attempt except the
//! last. A `false` answer stops the loop and surfaces the error unchanged.
//! Without a classifier every failure is retried.

/// Classifies a failed attempt as worth retrying or not
pub trait RetryPredicate<E: ?Sized>: Send + Sync {
    fn should_retry(&self, error: &E) -> bool;
}

/// Retry every failure; the executor default
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E: ?Sized> RetryPredicate<E> for AlwaysRetry {
    fn should_retry(&self, _error: &E) -> bool {
        true
    }
}

/// Errors that know whether they are transient
///
/// Timeouts, dropped connections, rate limiting and server-side failures
/// are transient. Bad credentials or a malformed request fail the same way
/// on every attempt.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Retry only errors reporting themselves as [`Transient`]
///
/// ```rust
/// use herald_core::retry::{RetryPredicate, Transient, TransientOnly};
///
/// struct Status(u16);
///
/// impl Transient for Status {
///     fn is_transient(&self) -> bool {
///         self.0 == 429 || self.0 >= 500
///     }
/// }
///
/// assert!(TransientOnly.should_retry(&Status(503)));
/// assert!(!TransientOnly.should_retry(&Status(401)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientOnly;

impl<E: Transient + ?Sized> RetryPredicate<E> for TransientOnly {
    fn should_retry(&self, error: &E) -> bool {
        error.is_transient()
    }
}

/// Classify with an ad-hoc closure
pub struct ClosurePredicate<F> {
    classify: F,
}

impl<F> ClosurePredicate<F> {
    pub fn new(classify: F) -> Self {
        Self { classify }
    }
}

impl<E, F> RetryPredicate<E> for ClosurePredicate<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E) -> bool {
        (self.classify)(error)
    }
}
