//! Post command

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use herald_client::{ApiClient, CREATE_POST_PATH};
use herald_core::oauth::Credentials;
use herald_core::types::RetryPolicy;
use serde_json::Value;

use crate::cli::PostArgs;
use crate::output;

pub async fn run(args: PostArgs, config_dir: Option<Utf8PathBuf>) -> Result<()> {
    let config = super::load_runtime_config(config_dir)?;
    let credentials = Credentials::from_env().context("Cannot post without credentials")?;

    let url = args
        .url
        .unwrap_or_else(|| config.api.endpoint(CREATE_POST_PATH));
    let client = ApiClient::new(config.api.clone(), credentials)?;

    tracing::info!(
        url = %url,
        max_attempts = config.retry.max_attempts,
        "publishing post"
    );

    let value = publish(&client, &url, &args.text, &config.retry).await?;

    output::success("Post published");
    if let Some(id) = value.pointer("/data/id").and_then(|id| id.as_str()) {
        output::kv("id", id);
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Failures are returned, not printed; `main` reports them once
async fn publish(client: &ApiClient, url: &str, text: &str, policy: &RetryPolicy) -> Result<Value> {
    client
        .post_json_with_retry(url, &serde_json::json!({ "text": text }), policy)
        .await
        .with_context(|| format!("Post to {} failed", url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_client::ApiError;
    use herald_core::types::{ApiConfig, RetryStrategy};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ApiConfig {
            base_url: server.uri(),
            http_timeout_secs: 5,
            ..ApiConfig::default()
        };
        ApiClient::new(config, Credentials::new("ck", "cs", "at", "as")).unwrap()
    }

    fn single_attempt() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 1,
            strategy: RetryStrategy::None,
            ..RetryPolicy::default()
        }
    }

    #[tokio::test]
    async fn test_failure_carries_the_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let url = format!("{}{}", server.uri(), CREATE_POST_PATH);
        let err = publish(&client, &url, "hello", &single_attempt())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), format!("Post to {} failed", url));
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Status { status: 403, .. })
        ));
        assert_eq!(err.chain().count(), 2);
    }

    #[tokio::test]
    async fn test_success_returns_the_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"data": {"id": "1", "text": "hello"}})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let url = format!("{}{}", server.uri(), CREATE_POST_PATH);
        let value = publish(&client, &url, "hello", &single_attempt())
            .await
            .unwrap();

        assert_eq!(value["data"]["id"], "1");
    }
}
