//! Signature base string construction and header assembly

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha1::Sha1;
use url::Url;

use super::credentials::Credentials;
use super::encode::percent_encode;
use super::error::SigningError;

type HmacSha1 = Hmac<Sha1>;

/// Parameters to sign, ordered by key byte value
pub type Params = BTreeMap<String, String>;

/// Value of `oauth_signature_method`
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Value of `oauth_version`
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_BYTES: usize = 16;

/// Build a parameter map from string-coercible values
///
/// ```rust
/// use herald_core::oauth::params_from;
///
/// let params = params_from([("count", 3)]);
/// assert_eq!(params["count"], "3");
/// ```
pub fn params_from<I, K, V>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.to_string()))
        .collect()
}

/// 16 bytes from the OS CSPRNG, hex-encoded
pub fn generate_nonce() -> Result<String, SigningError> {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SigningError::Randomness(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Current Unix time in whole seconds
pub fn unix_timestamp() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// `enc(key)=enc(value)` pairs joined with `&`, in key order
pub fn param_string(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Parameter string for pairs whose keys may repeat
///
/// Pairs are encoded first, then sorted by encoded key and, for equal keys,
/// by encoded value.
pub fn pair_string(pairs: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = pairs
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    encoded.sort();

    encoded
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// `METHOD&enc(url)&enc(param_string)`
pub fn signature_base_string(method: &str, url: &str, param_string: &str) -> String {
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(param_string)
    )
}

/// `enc(consumer_secret)&enc(token_secret)`
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}

/// Base64 of HMAC-SHA1(key, base_string)
pub fn hmac_sha1_base64(key: &str, base_string: &str) -> Result<String, SigningError> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
    mac.update(base_string.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

/// A computed OAuth 1.0a authorization
///
/// Holds the protocol parameters that go into the header (including
/// `oauth_signature`) and the base string they were derived from. Body and
/// query parameters are part of the signature but never of the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthHeader {
    parameters: Params,
    base_string: String,
}

impl OAuthHeader {
    /// Header parameters, `oauth_signature` included
    pub fn parameters(&self) -> &Params {
        &self.parameters
    }

    /// The signature base string that was signed
    pub fn base_string(&self) -> &str {
        &self.base_string
    }

    pub fn signature(&self) -> &str {
        self.parameter("oauth_signature")
    }

    pub fn nonce(&self) -> &str {
        self.parameter("oauth_nonce")
    }

    pub fn timestamp(&self) -> &str {
        self.parameter("oauth_timestamp")
    }

    fn parameter(&self, name: &str) -> &str {
        self.parameters.get(name).map(String::as_str).unwrap_or("")
    }

    /// `OAuth k="v", ...` with keys in ascending byte order
    pub fn to_header_value(&self) -> String {
        let fields = self
            .parameters
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {}", fields)
    }
}

impl fmt::Display for OAuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

/// Sign a request with a fresh nonce and the current time
///
/// `body_params` only enter the signature when `method` is POST; pass
/// `None` for JSON or empty bodies.
pub fn sign(
    method: &str,
    url: &str,
    body_params: Option<&Params>,
    credentials: &Credentials,
) -> Result<String, SigningError> {
    credentials.validate()?;
    let nonce = generate_nonce()?;
    sign_with(
        method,
        url,
        body_params,
        credentials,
        &nonce,
        unix_timestamp(),
    )
}

/// Deterministic variant of [`sign`] with caller-supplied nonce and timestamp
pub fn sign_with(
    method: &str,
    url: &str,
    body_params: Option<&Params>,
    credentials: &Credentials,
    nonce: &str,
    timestamp: u64,
) -> Result<String, SigningError> {
    authorize(method, url, body_params, credentials, nonce, timestamp)
        .map(|header| header.to_header_value())
}

/// Sign a URL whose query string carries the parameters to sign
///
/// Query parameters are signed for every method. The URL is normalised
/// (lowercase scheme and host, default port dropped) and signed without its
/// query and fragment. Repeated query keys are all signed.
pub fn sign_url(method: &str, url: &str, credentials: &Credentials) -> Result<String, SigningError> {
    credentials.validate()?;
    let nonce = generate_nonce()?;
    authorize_url(method, url, credentials, &nonce, unix_timestamp())
        .map(|header| header.to_header_value())
}

/// Compute the full authorization for a body-parameter request
pub fn authorize(
    method: &str,
    url: &str,
    body_params: Option<&Params>,
    credentials: &Credentials,
    nonce: &str,
    timestamp: u64,
) -> Result<OAuthHeader, SigningError> {
    credentials.validate()?;
    validate_method(method)?;

    let oauth = protocol_params(credentials, nonce, timestamp);
    let mut signed = oauth.clone();
    if let Some(body) = body_params.filter(|_| method.eq_ignore_ascii_case("POST")) {
        signed.extend(body.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    finish(method, url, oauth, &param_string(&signed), credentials)
}

/// Compute the full authorization for a query-parameter request
pub fn authorize_url(
    method: &str,
    url: &str,
    credentials: &Credentials,
    nonce: &str,
    timestamp: u64,
) -> Result<OAuthHeader, SigningError> {
    let mut parsed = Url::parse(url).map_err(|e| SigningError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    credentials.validate()?;
    validate_method(method)?;

    let oauth = protocol_params(credentials, nonce, timestamp);
    let mut signed: Vec<(String, String)> = oauth
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    signed.extend(
        parsed
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned())),
    );

    parsed.set_query(None);
    parsed.set_fragment(None);

    finish(method, parsed.as_str(), oauth, &pair_string(&signed), credentials)
}

fn protocol_params(credentials: &Credentials, nonce: &str, timestamp: u64) -> Params {
    params_from([
        ("oauth_consumer_key", credentials.consumer_key().to_string()),
        ("oauth_nonce", nonce.to_string()),
        ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
        ("oauth_timestamp", timestamp.to_string()),
        ("oauth_token", credentials.access_token().to_string()),
        ("oauth_version", OAUTH_VERSION.to_string()),
    ])
}

fn finish(
    method: &str,
    url: &str,
    mut oauth: Params,
    param_string: &str,
    credentials: &Credentials,
) -> Result<OAuthHeader, SigningError> {
    let base_string = signature_base_string(method, url, param_string);
    let key = signing_key(credentials.consumer_secret(), credentials.access_secret());
    let signature = hmac_sha1_base64(&key, &base_string)?;

    oauth.insert("oauth_signature".to_string(), signature);

    Ok(OAuthHeader {
        parameters: oauth,
        base_string,
    })
}

/// RFC 7230 token characters only
fn validate_method(method: &str) -> Result<(), SigningError> {
    let is_tchar = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c);

    if method.is_empty() || !method.chars().all(is_tchar) {
        return Err(SigningError::InvalidMethod(method.to_string()));
    }
    Ok(())
}
