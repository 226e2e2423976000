//! OAuth 1.0a credential set

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::SigningError;
use crate::error::{Error, Result};

/// Environment variable holding the consumer (API) key
pub const ENV_CONSUMER_KEY: &str = "TWITTER_API_KEY";
/// Environment variable holding the consumer (API) secret
pub const ENV_CONSUMER_SECRET: &str = "TWITTER_API_SECRET";
/// Environment variable holding the user access token
pub const ENV_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
/// Environment variable holding the user access token secret
pub const ENV_ACCESS_SECRET: &str = "TWITTER_ACCESS_SECRET";

/// The four strings needed to sign a request on behalf of a user
///
/// Values are zeroed on drop and never printed by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_secret: String,
}

impl Credentials {
    /// Create a credential set
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_secret: access_secret.into(),
        }
    }

    /// Read credentials from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup
    ///
    /// Unset and empty variables are both reported as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::missing_credential(name))
        };

        Ok(Self::new(
            read(ENV_CONSUMER_KEY)?,
            read(ENV_CONSUMER_SECRET)?,
            read(ENV_ACCESS_TOKEN)?,
            read(ENV_ACCESS_SECRET)?,
        ))
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn access_secret(&self) -> &str {
        &self.access_secret
    }

    /// Check that no credential is empty or whitespace-only
    pub fn validate(&self) -> std::result::Result<(), SigningError> {
        let fields = [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("access_secret", &self.access_secret),
        ];

        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(SigningError::MissingCredential { field: *field }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"[REDACTED]")
            .field("consumer_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("access_secret", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}
