//! GraphQL and REST HTTP client implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::{
    AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT,
};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::GraphqlClientError;
use crate::operation::{GraphqlOperation, GraphqlRequest, GraphqlResponse, concat_operations};
use crate::retry::{RetryDecision, RetryPolicy};
use crate::variables::Variables;

/// Header carrying the per-client correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
/// Header carrying the per-attempt request id.
pub const REQUEST_ID_HEADER: &str = "x-twingate-request-id";

/// Per-client call counters, shared by clones.
#[derive(Debug, Default)]
pub struct CallStats {
    calls: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    retried: AtomicU64,
}

impl CallStats {
    /// Current counter values.
    #[must_use]
    pub fn snapshot(&self) -> CallStatsSnapshot {
        CallStatsSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            retried: self.retried.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CallStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallStatsSnapshot {
    /// HTTP attempts sent.
    pub calls: u64,
    /// Calls that returned data.
    pub succeeded: u64,
    /// Calls that failed after the last attempt.
    pub failed: u64,
    /// Retries performed.
    pub retried: u64,
}

/// GraphQL client configuration.
#[derive(Debug, Clone)]
pub struct GraphqlClientConfig {
    /// Default headers applied to every request.
    pub headers: HeaderMap,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retry policy.
    pub retry: RetryPolicy,
    /// Base URL for REST calls.
    pub rest_url: Option<String>,
}

impl Default for GraphqlClientConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            headers,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            rest_url: None,
        }
    }
}

/// GraphQL client builder.
#[derive(Debug, Clone)]
pub struct GraphqlClientBuilder {
    endpoint: String,
    config: GraphqlClientConfig,
    correlation_id: Option<String>,
    invalid_header: Option<GraphqlClientError>,
}

impl GraphqlClientBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            config: GraphqlClientConfig::default(),
            correlation_id: None,
            invalid_header: None,
        }
    }

    /// Set the base URL used by [`GraphqlClient::post_rest`].
    #[must_use]
    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.config.rest_url = Some(url.into());
        self
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.config.headers.insert(name, value);
        self
    }

    /// Add a bearer token header.
    #[must_use]
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_header_str(AUTHORIZATION, &value, true)
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(self, agent: impl AsRef<str>) -> Self {
        self.with_header_str(USER_AGENT, agent.as_ref(), false)
    }

    /// Override the correlation id (a random one is generated otherwise).
    #[must_use]
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Set per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    fn with_header_str(mut self, name: HeaderName, value: &str, sensitive: bool) -> Self {
        match HeaderValue::from_str(value) {
            Ok(mut header) => {
                header.set_sensitive(sensitive);
                self.config.headers.insert(name, header);
            }
            Err(err) => {
                self.invalid_header.get_or_insert(GraphqlClientError::InvalidHeader {
                    name: name.to_string(),
                    message: err.to_string(),
                });
            }
        }
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GraphqlClient, GraphqlClientError> {
        if let Some(err) = self.invalid_header {
            return Err(err);
        }
        let correlation_id = self
            .correlation_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut config = self.config;
        let value = HeaderValue::from_str(&correlation_id).map_err(|err| {
            GraphqlClientError::InvalidHeader {
                name: CORRELATION_ID_HEADER.to_string(),
                message: err.to_string(),
            }
        })?;
        config
            .headers
            .insert(HeaderName::from_static(CORRELATION_ID_HEADER), value);

        GraphqlClient::with_config(self.endpoint, correlation_id, config)
    }
}

/// GraphQL client.
///
/// Cheap to clone; clones share the connection pool and call counters.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: String,
    http: reqwest::Client,
    config: GraphqlClientConfig,
    correlation_id: String,
    stats: Arc<CallStats>,
}

impl GraphqlClient {
    fn with_config(
        endpoint: String,
        correlation_id: String,
        config: GraphqlClientConfig,
    ) -> Result<Self, GraphqlClientError> {
        let http = reqwest::Client::builder()
            .default_headers(config.headers.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            endpoint,
            http,
            config,
            correlation_id,
            stats: Arc::new(CallStats::default()),
        })
    }

    /// GraphQL endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// REST base URL, if configured.
    pub fn rest_url(&self) -> Option<&str> {
        self.config.rest_url.as_deref()
    }

    /// Correlation id sent with every request from this client.
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Retry policy in effect.
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.config.retry
    }

    /// Counters for calls made through this client and its clones.
    #[must_use]
    pub fn stats(&self) -> CallStatsSnapshot {
        self.stats.snapshot()
    }

    /// Execute a typed operation and return its data.
    ///
    /// GraphQL errors in the envelope become
    /// [`GraphqlClientError::GraphqlErrors`]; they are never retried.
    pub async fn execute<O: GraphqlOperation>(
        &self,
        ctx: &RequestContext,
        variables: &Variables,
    ) -> Result<O, GraphqlClientError> {
        let operation_name =
            concat_operations([ctx.caller().unwrap_or_default(), O::OPERATION_NAME]);
        let request = GraphqlRequest::new(O::document(&operation_name), variables)
            .with_operation_name(operation_name.as_str());
        let body = serde_json::to_vec(&request)?;

        let bytes = self
            .send_with_retry(ctx, &self.endpoint, &body, &HeaderMap::new(), &operation_name)
            .await?;
        let result = serde_json::from_slice::<GraphqlResponse<O>>(&bytes)
            .map_err(GraphqlClientError::from)
            .and_then(GraphqlResponse::into_result);

        let counter = if result.is_ok() {
            &self.stats.succeeded
        } else {
            &self.stats.failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
        result
    }

    /// POST a JSON payload to `{rest_url}{path}` and return the raw body.
    ///
    /// `headers` override the client defaults for this call only.
    pub async fn post_rest<P: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        path: &str,
        payload: &P,
        headers: &HeaderMap,
    ) -> Result<Vec<u8>, GraphqlClientError> {
        let base = self
            .config
            .rest_url
            .as_deref()
            .ok_or_else(|| GraphqlClientError::Protocol {
                message: "REST endpoint is not configured".to_string(),
            })?;
        let url = format!("{base}{path}");
        let body = serde_json::to_vec(payload)?;

        let bytes = self
            .send_with_retry(ctx, &url, &body, headers, path)
            .await?;
        self.stats.succeeded.fetch_add(1, Ordering::Relaxed);
        Ok(bytes)
    }

    async fn send_with_retry(
        &self,
        ctx: &RequestContext,
        url: &str,
        body: &[u8],
        headers: &HeaderMap,
        operation: &str,
    ) -> Result<Vec<u8>, GraphqlClientError> {
        let mut retries = 0;
        loop {
            let request_id = Uuid::new_v4().to_string();
            debug!(
                operation,
                request_id = %request_id,
                attempt = retries + 1,
                "sending request"
            );
            let result = match ctx
                .run(self.send_once(url, body, headers, &request_id))
                .await
            {
                Ok(result) => result,
                Err(err) => Err(GraphqlClientError::from(err)),
            };

            let err = match result {
                Ok(bytes) => return Ok(bytes),
                Err(err) => err,
            };
            match self.config.retry.decide(&err, retries) {
                RetryDecision::RetryAfter(delay) => {
                    self.stats.retried.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        request_id = %request_id,
                        url,
                        error = %err,
                        retry = retries + 1,
                        ?delay,
                        "going to retry call"
                    );
                    if !delay.is_zero() {
                        ctx.run(tokio::time::sleep(delay)).await?;
                    }
                    retries += 1;
                }
                RetryDecision::DoNotRetry => {
                    self.stats.failed.fetch_add(1, Ordering::Relaxed);
                    return Err(err);
                }
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        body: &[u8],
        headers: &HeaderMap,
        request_id: &str,
    ) -> Result<Vec<u8>, GraphqlClientError> {
        self.stats.calls.fetch_add(1, Ordering::Relaxed);
        let response = self
            .http
            .post(url)
            .headers(headers.clone())
            .header(REQUEST_ID_HEADER, request_id)
            .body(body.to_vec())
            .send()
            .await?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(GraphqlClientError::HttpStatus {
                url: url.to_string(),
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
                retry_after,
            });
        }

        Ok(bytes.to_vec())
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get(RETRY_AFTER)?;
    let value = header.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
