//! Error types for herald-client

use herald_core::retry::{RetryError, Transient};
use herald_core::SigningError;
use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient)
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be signed
    #[error("Failed to sign request: {0}")]
    Signing(#[from] SigningError),

    /// Transport failure (connect, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The retry policy could not be executed
    #[error("Invalid retry policy: {reason}")]
    InvalidPolicy { reason: String },

    /// The request was cancelled before it completed
    #[error("Request cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

/// Transport failures, 408, 425, 429 and every 5xx are worth retrying.
/// Signing and decoding failures repeat on every attempt.
impl Transient for ApiError {
    fn is_transient(&self) -> bool {
        match self {
            ApiError::Request(_) => true,
            ApiError::Status { status, .. } => {
                matches!(status, 408 | 425 | 429) || (500..=599).contains(status)
            }
            _ => false,
        }
    }
}

impl From<RetryError<ApiError>> for ApiError {
    fn from(err: RetryError<ApiError>) -> Self {
        match err {
            RetryError::Operation(source) => source,
            RetryError::InvalidPolicy { reason } => ApiError::InvalidPolicy { reason },
            RetryError::Cancelled {
                attempts,
                last_error,
            } => {
                if let Some(last) = last_error {
                    tracing::debug!(error = %last, "last error before cancellation");
                }
                ApiError::Cancelled { attempts }
            }
        }
    }
}
