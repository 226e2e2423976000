//! Error types for OAuth signing

use thiserror::Error;

/// Errors raised while building a signed authorization header
///
/// Every variant is fatal for the signing call. The signer never retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// A credential string is empty
    #[error("Missing credential: {field} is empty")]
    MissingCredential { field: &'static str },

    /// The OS random number generator failed
    #[error("Failed to generate nonce: {0}")]
    Randomness(String),

    /// The HTTP method is empty or not a valid token
    #[error("Invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// The target URL could not be parsed
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HMAC key was rejected
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// Percent-decoding produced invalid UTF-8
    #[error("Invalid percent-encoding: {0}")]
    Decode(String),
}
