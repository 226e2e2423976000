//! Retry execution engine with policy-based configuration
//!
//! This module runs a caller-supplied async operation, retrying failures
//! with exponential backoff plus jitter until the attempt budget in a
//! [`RetryPolicy`](crate::types::RetryPolicy) is spent.
//!
//! # Features
//!
//! - Strategies: Exponential (default), Fixed, Linear, None
//! - Uniform jitter in `[0, jitter_ms]` added to every delay
//! - `RetryObserver` capability notified before every retry
//! - Optional `RetryPredicate` classifier (default: retry everything;
//!   `TransientOnly` for errors implementing `Transient`)
//! - Cancellation through `tokio_util::sync::CancellationToken`
//! - The last operation error is returned unchanged on exhaustion
//!
//! # Example
//!
//! ```rust,no_run
//! use herald_core::retry::{retry_with_policy, RetryError};
//! use herald_core::types::RetryPolicy;
//!
//! async fn example() -> Result<String, RetryError<std::io::Error>> {
//!     let policy = RetryPolicy::default();
//!
//!     retry_with_policy(&policy, || async {
//!         // Your fallible operation here
//!         Ok("success".to_string())
//!     }).await
//! }
//! ```

mod classify;
mod error;
mod executor;
mod observer;
mod strategies;

pub use error::RetryError;
pub use executor::{retry_with_policy, RetryExecutor, RetryExecutorBuilder};
pub use observer::{NoOpObserver, ObserverFn, RetryObserver, StatsObserver, TracingObserver};
pub use classify::{AlwaysRetry, ClosurePredicate, RetryPredicate, Transient, TransientOnly};
pub use strategies::{base_delay, calculate_delay};
pub use tokio_util::sync::CancellationToken;
