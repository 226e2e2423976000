//! Common test infrastructure for herald-client tests
//!
//! - Fixed credentials and policies
//! - Wiremock setup helpers for flaky and failing endpoints
//! - A matcher that re-verifies the OAuth signature on the server side

#![allow(dead_code)]

use std::collections::BTreeMap;

use herald_client::ApiClient;
use herald_core::oauth::{authorize, percent_decode, Credentials, Params};
use herald_core::types::{ApiConfig, RetryPolicy, RetryStrategy};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

pub const CONSUMER_KEY: &str = "xvz1evFS4wEEPTGEFPHBog";
pub const CONSUMER_SECRET: &str = "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw";
pub const ACCESS_TOKEN: &str = "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb";
pub const ACCESS_SECRET: &str = "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE";

pub fn credentials() -> Credentials {
    Credentials::new(CONSUMER_KEY, CONSUMER_SECRET, ACCESS_TOKEN, ACCESS_SECRET)
}

pub fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig {
        base_url: server.uri(),
        http_timeout_secs: 5,
        ..ApiConfig::default()
    };
    ApiClient::new(config, credentials()).expect("valid test client")
}

/// Small real-time delays; reqwest timers do not mix with a paused clock
pub fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        strategy: RetryStrategy::ExponentialBackoff,
        backoff_multiplier: 2.0,
        initial_delay_ms: 5,
        max_delay_ms: 20,
        jitter_ms: 0,
    }
}

/// Split an `OAuth k="v", ...` header value into decoded pairs
pub fn parse_authorization(value: &str) -> BTreeMap<String, String> {
    let fields = value.strip_prefix("OAuth ").unwrap_or(value);

    fields
        .split(", ")
        .filter_map(|pair| {
            let (key, quoted) = pair.split_once('=')?;
            let raw = quoted.trim_matches('"');
            Some((
                percent_decode(key).ok()?,
                percent_decode(raw).ok()?,
            ))
        })
        .collect()
}

pub fn authorization_of(request: &Request) -> Option<BTreeMap<String, String>> {
    let value = request.headers.get("authorization")?.to_str().ok()?;
    Some(parse_authorization(value))
}

/// Matches only requests whose OAuth signature verifies for `url`
///
/// Form bodies are decoded and folded into the signature, mirroring what
/// the client does when signing.
pub struct ValidSignature {
    pub url: String,
    pub credentials: Credentials,
}

impl Match for ValidSignature {
    fn matches(&self, request: &Request) -> bool {
        let Some(oauth) = authorization_of(request) else {
            return false;
        };
        let (Some(nonce), Some(timestamp), Some(signature)) = (
            oauth.get("oauth_nonce"),
            oauth.get("oauth_timestamp").and_then(|t| t.parse::<u64>().ok()),
            oauth.get("oauth_signature"),
        ) else {
            return false;
        };

        let is_form = request
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        let body: Params = if is_form {
            url::form_urlencoded::parse(&request.body)
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        } else {
            Params::new()
        };

        match authorize(
            request.method.as_str(),
            &self.url,
            Some(&body),
            &self.credentials,
            nonce,
            timestamp,
        ) {
            Ok(expected) => expected.signature() == signature.as_str(),
            Err(_) => false,
        }
    }
}

/// First `fail_count` requests get `status`, later ones get `body` with 200
pub async fn mock_flaky_post(
    server: &MockServer,
    route: &str,
    fail_count: u64,
    status: u16,
    body: serde_json::Value,
) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string("try again"))
        .up_to_n_times(fail_count)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Every request gets `status`
pub async fn mock_failing_post(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string("unavailable"))
        .mount(server)
        .await;
}
