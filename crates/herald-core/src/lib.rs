//! # herald-core
//!
//! Core library for Herald providing:
//! - OAuth 1.0a (HMAC-SHA1) request signing
//! - Retry execution engine with policy-based configuration
//! - Depth-bounded error reporting for structured logs
//! - Runtime configuration loading (embedded defaults, YAML, environment)

pub mod config;
pub mod error;
pub mod oauth;
pub mod report;
pub mod retry;
pub mod types;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use oauth::{sign, sign_url, sign_with, Credentials, OAuthHeader, Params, SigningError};
pub use report::ErrorReport;
pub use retry::{retry_with_policy, RetryError, RetryExecutor, RetryExecutorBuilder};
pub use types::{ApiConfig, RetryPolicy, RetryStrategy, RuntimeConfig};
