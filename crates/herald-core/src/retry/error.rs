//! Error types for the retry execution engine
//!
//! The executor never wraps the operation's own failure: whatever the last
//! attempt returned is handed back as [`RetryError::Operation`]. The other
//! variants describe conditions the operation never saw.

use std::error::Error;
use std::fmt;

/// Errors that can occur during retry execution
///
/// The error type is generic over `E`, the underlying error type from the
/// operation being retried.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The error returned by the final attempt, unchanged
    ///
    /// Returned when the attempt budget is spent or when the predicate
    /// declines to retry. `Display` and `source()` forward to the inner error.
    Operation(E),

    /// The policy cannot be executed (e.g. `max_attempts == 0`)
    InvalidPolicy {
        /// Why the policy was rejected
        reason: String,
    },

    /// The retry was cancelled through its cancellation token
    Cancelled {
        /// Number of attempts started before cancellation
        attempts: u32,
        /// The last error that occurred, if any
        last_error: Option<E>,
    },
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Operation(source) => write!(f, "{}", source),
            RetryError::InvalidPolicy { reason } => {
                write!(f, "invalid retry policy: {}", reason)
            }
            RetryError::Cancelled {
                attempts,
                last_error,
            } => {
                if let Some(err) = last_error {
                    write!(f, "retry cancelled after {} attempts: {}", attempts, err)
                } else {
                    write!(f, "retry cancelled after {} attempts", attempts)
                }
            }
        }
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RetryError::Operation(source) => source.source(),
            RetryError::Cancelled {
                last_error: Some(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

impl<E> RetryError<E> {
    /// Create an invalid policy error
    pub fn invalid_policy(reason: impl Into<String>) -> Self {
        RetryError::InvalidPolicy {
            reason: reason.into(),
        }
    }

    /// Create a new cancelled error
    pub fn cancelled(attempts: u32, last_error: Option<E>) -> Self {
        RetryError::Cancelled {
            attempts,
            last_error,
        }
    }

    /// Check if this is the operation's own error
    pub fn is_operation(&self) -> bool {
        matches!(self, RetryError::Operation(_))
    }

    /// Check if the policy was rejected
    pub fn is_invalid_policy(&self) -> bool {
        matches!(self, RetryError::InvalidPolicy { .. })
    }

    /// Check if this error indicates cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }

    /// Get the underlying error, consuming this error
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Operation(source) => Some(source),
            RetryError::Cancelled { last_error, .. } => last_error,
            RetryError::InvalidPolicy { .. } => None,
        }
    }

    /// Get a reference to the underlying error
    pub fn source_ref(&self) -> Option<&E> {
        match self {
            RetryError::Operation(source) => Some(source),
            RetryError::Cancelled { last_error, .. } => last_error.as_ref(),
            RetryError::InvalidPolicy { .. } => None,
        }
    }

    /// Map the error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            RetryError::Operation(source) => RetryError::Operation(f(source)),
            RetryError::InvalidPolicy { reason } => RetryError::InvalidPolicy { reason },
            RetryError::Cancelled {
                attempts,
                last_error,
            } => RetryError::Cancelled {
                attempts,
                last_error: last_error.map(f),
            },
        }
    }
}
