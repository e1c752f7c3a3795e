use bytes::Bytes;
use reqwest::{header::HeaderMap, Client, ClientBuilder, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, time::Duration};
use url::Url;

use super::{AdapterResponse, BenchError};

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    concat!("rpcbench/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_pool_max_idle_per_host() -> usize {
    16
}

/// Configuration for the HTTP client (`[http]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Per-request deadline in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: default_user_agent(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
        }
    }
}

/// Shared HTTP client for all adapters.
///
/// No retries: a benchmark sample must measure exactly one attempt.
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

// Note: Default is intentionally NOT implemented because HttpClient::new() can fail.

impl HttpClient {
    /// Creates a new HTTP client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn new() -> Result<Self, BenchError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Sanitizes network errors to prevent information disclosure.
    fn sanitize_network_error(error: &reqwest::Error) -> &'static str {
        if error.is_timeout() {
            "connection timed out"
        } else if error.is_connect() {
            "connection refused or unreachable"
        } else if error.is_request() {
            "request failed"
        } else if error.is_body() {
            "response body error"
        } else if error.is_decode() {
            "response decode error"
        } else if error.is_redirect() {
            "too many redirects"
        } else {
            "network error"
        }
    }

    /// Creates a new HTTP client with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, BenchError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.clone())
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                BenchError::ClientBuild(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// POSTs a JSON body.
    pub async fn post_json(&self, url: &Url, body: Bytes) -> AdapterResponse {
        let request = self
            .client
            .post(url.clone())
            .header("content-type", "application/json")
            .body(body);
        self.execute(url, request).await
    }

    /// Issues a GET.
    pub async fn get(&self, url: &Url) -> AdapterResponse {
        let request = self.client.get(url.clone()).header("accept", "application/json");
        self.execute(url, request).await
    }

    async fn execute(&self, url: &Url, request: RequestBuilder) -> AdapterResponse {
        let host = url.host_str().unwrap_or_default();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let detail = Self::sanitize_network_error(&e);
                tracing::trace!(host = host, error = detail, "http request error");
                return AdapterResponse::network_failure(detail);
            }
        };

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        let body = match response.bytes().await {
            Ok(bytes) => parse_body(&bytes),
            Err(e) => {
                let detail = Self::sanitize_network_error(&e);
                tracing::trace!(host = host, status = status, error = detail, "http body error");
                return AdapterResponse::network_failure(detail);
            }
        };

        tracing::trace!(host = host, status = status, "http request completed");
        AdapterResponse::http(status, headers, body)
    }
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}

/// JSON when it parses, the raw text otherwise, `null` for an empty body.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
