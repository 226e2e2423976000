//! Signed API client

use std::time::Duration;

use herald_core::oauth::{sign, Credentials, Params};
use herald_core::retry::{RetryExecutorBuilder, TracingObserver, TransientOnly};
use herald_core::types::{ApiConfig, RetryPolicy};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ApiError;

/// Endpoint used by [`ApiClient::create_post`]
pub const CREATE_POST_PATH: &str = "/2/tweets";

/// A post created by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostCreated {
    pub id: String,
    pub text: String,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Serialize)]
struct CreatePostBody<'a> {
    text: &'a str,
}

/// HTTP client that signs every request with OAuth 1.0a
///
/// One `reqwest::Client` is shared by all requests. Credentials are held
/// for the lifetime of the client and never logged.
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a client, rejecting incomplete credentials up front
    pub fn new(config: ApiConfig, credentials: Credentials) -> Result<Self, ApiError> {
        credentials.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// POST a JSON body
    ///
    /// JSON bodies are not part of the OAuth signature; only the oauth_*
    /// parameters are signed.
    #[instrument(skip(self, body))]
    pub async fn post_json<B>(&self, url: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let authorization = sign("POST", url, None, &self.credentials)?;

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// POST a form-encoded body whose parameters are included in the signature
    #[instrument(skip(self, params))]
    pub async fn post_form(&self, url: &str, params: &Params) -> Result<Value, ApiError> {
        let authorization = sign("POST", url, Some(params), &self.credentials)?;

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, authorization)
            .form(params)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// POST a JSON body under the retry policy
    ///
    /// Each attempt is signed again, so every request carries a fresh nonce
    /// and timestamp. Only transient failures are retried. On exhaustion the
    /// last attempt's error is returned as-is.
    pub async fn post_json_with_retry<B>(
        &self,
        url: &str,
        body: &B,
        policy: &RetryPolicy,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let executor = RetryExecutorBuilder::new()
            .with_policy(policy.clone())
            .with_predicate(TransientOnly)
            .with_observer(TracingObserver::new(format!("POST {}", url)))
            .build();

        executor
            .execute(|| self.post_json(url, body))
            .await
            .map_err(ApiError::from)
    }

    /// Publish a text post, retrying per `policy`
    pub async fn create_post(&self, text: &str, policy: &RetryPolicy) -> Result<PostCreated, ApiError> {
        let url = self.config.endpoint(CREATE_POST_PATH);
        let value = self
            .post_json_with_retry(&url, &CreatePostBody { text }, policy)
            .await?;

        let envelope: DataEnvelope<PostCreated> =
            serde_json::from_value(value).map_err(ApiError::Decode)?;

        debug!(id = %envelope.data.id, "post created");
        Ok(envelope.data)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(ApiError::Decode)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
