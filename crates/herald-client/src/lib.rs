//! # herald-client
//!
//! HTTP client that signs every request with OAuth 1.0a and retries
//! transient failures through the herald-core retry executor.

mod client;
mod error;

pub use client::{ApiClient, PostCreated, CREATE_POST_PATH};
pub use error::ApiError;
