//! OAuth 1.0a request signing (HMAC-SHA1)
//!
//! This module builds `Authorization: OAuth ...` header values for a REST
//! API that expects OAuth 1.0a user-context authentication. Signing is a
//! pure, CPU-bound value transform: no I/O, no logging, no caching of
//! credentials between calls.
//!
//! # Features
//!
//! - RFC 3986 percent-encoding (`%20` for space, unreserved set untouched)
//! - Form-encoded POST body parameters merged into the signature
//! - Query-string signing via [`sign_url`]
//! - Deterministic [`sign_with`] for golden-vector testing
//!
//! # Example
//!
//! ```rust
//! use herald_core::oauth::{sign, Credentials};
//!
//! let credentials = Credentials::new("key", "secret", "token", "token-secret");
//! let header = sign("POST", "https://api.twitter.com/2/tweets", None, &credentials).unwrap();
//! assert!(header.starts_with("OAuth "));
//! ```

mod credentials;
mod encode;
mod error;
mod signer;

pub use credentials::{
    Credentials, ENV_ACCESS_SECRET, ENV_ACCESS_TOKEN, ENV_CONSUMER_KEY, ENV_CONSUMER_SECRET,
};
pub use encode::{percent_decode, percent_encode};
pub use error::SigningError;
pub use signer::{
    authorize, authorize_url, generate_nonce, hmac_sha1_base64, pair_string, param_string, params_from,
    sign, sign_url, sign_with, signature_base_string, signing_key, unix_timestamp, OAuthHeader, Params,
    OAUTH_VERSION, SIGNATURE_METHOD,
};
