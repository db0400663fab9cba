//! HTTP client shared by the remote providers

use crate::error::{ProviderError, ProviderResult};
use annaseva_core::config::ProvidersConfig;
use annaseva_core::retry::RetryConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// GET-only JSON client with retry and request correlation
///
/// Wraps `reqwest` and adds:
/// - Exponential backoff for connect errors, timeouts, 5xx and 429
/// - An `X-Request-ID` header per logical request, shared by its retries
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    retry: RetryConfig,
}

impl HttpClient {
    /// Create a client with an explicit timeout and retry policy
    pub fn new(timeout: Duration, retry: RetryConfig) -> ProviderResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("annaseva/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ProviderError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { inner, retry })
    }

    /// Create a client from the `[providers]` configuration section
    pub fn from_config(config: &ProvidersConfig) -> ProviderResult<Self> {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            RetryConfig::default().with_max_attempts(config.max_attempts),
        )
    }

    /// Retry policy in use
    #[must_use]
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// GET `url` with `query` parameters and decode the JSON body
    #[instrument(skip(self, query), fields(request_id))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let mut last_error: Option<ProviderError> = None;

        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                let delay = self.retry.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self.execute_once(&request_id, url, query).await;
            let elapsed = start.elapsed();

            match result {
                Ok(value) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && self.retry.should_retry(attempt + 1) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, will retry"
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, not retrying"
                    );
                    return Err(e);
                }
            }
        }

        Err(ProviderError::RetriesExhausted {
            attempts: self.retry.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    async fn execute_once<T: DeserializeOwned>(
        &self,
        request_id: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<T> {
        let response = self
            .inner
            .get(url)
            .query(query)
            .header(X_REQUEST_ID, request_id)
            .send()
            .await?;

        handle_response(response).await
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> ProviderResult<T> {
    let status = response.status();

    if status.is_success() {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ProviderError::api_response(status.as_u16(), message))
    }
}
