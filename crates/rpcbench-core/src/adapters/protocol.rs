use bytes::Bytes;
use serde_json::{json, Value};
use std::sync::Arc;
use url::Url;

use super::{AdapterResponse, HttpClient};
use crate::{
    network::{Endpoint, Transport},
    types::JsonRpcRequest,
    utils::quantity::BlockRef,
};

/// Transport-independent description of a read.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalRequest {
    BlockNumber,
    LatestBlock { full_transactions: bool },
    Balance { address: String, block: BlockRef },
    GasPrice,
    Call { to: String, data: String },
    Raw { method: String, params: Value },
}

impl LogicalRequest {
    /// JSON-RPC method and positional params for this request.
    #[must_use]
    pub fn to_rpc(&self) -> (String, Value) {
        match self {
            Self::BlockNumber => ("eth_blockNumber".to_string(), json!([])),
            Self::LatestBlock { full_transactions } => {
                ("eth_getBlockByNumber".to_string(), json!(["latest", full_transactions]))
            }
            Self::Balance { address, block } => {
                ("eth_getBalance".to_string(), json!([address, block.to_param()]))
            }
            Self::GasPrice => ("eth_gasPrice".to_string(), json!([])),
            Self::Call { to, data } => {
                ("eth_call".to_string(), json!([{ "to": to, "data": data }, "latest"]))
            }
            Self::Raw { method, params } => (method.clone(), params.clone()),
        }
    }

    /// Requests that aggregators answer with their configured block-height call.
    #[must_use]
    pub fn is_height_probe(&self) -> bool {
        matches!(self, Self::BlockNumber | Self::LatestBlock { .. })
    }
}

/// Builds provider-specific wire calls and normalizes their responses.
#[derive(Clone)]
pub struct ProtocolAdapter {
    client: Arc<HttpClient>,
}

impl ProtocolAdapter {
    #[must_use]
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Dispatches a logical request over the endpoint's transport.
    ///
    /// REST and GraphQL endpoints only answer height probes; anything else returns
    /// [`AdapterResponse::unsupported_request`] without sending.
    pub async fn execute(&self, endpoint: &Endpoint, request: &LogicalRequest) -> AdapterResponse {
        match endpoint.transport() {
            Transport::Rpc => {
                let (method, params) = request.to_rpc();
                self.rpc(endpoint, &method, params).await
            }
            Transport::Rest if request.is_height_probe() => {
                self.rest_get(endpoint, None, &[]).await
            }
            Transport::GraphQl if request.is_height_probe() => {
                self.graphql(endpoint, endpoint.graphql_height_query(), json!({})).await
            }
            Transport::Rest | Transport::GraphQl => AdapterResponse::unsupported_request(),
        }
    }

    /// Single JSON-RPC call with id `1`.
    ///
    /// `ok` requires a 2xx status and an envelope with `result` and no `error`.
    pub async fn rpc(&self, endpoint: &Endpoint, method: &str, params: Value) -> AdapterResponse {
        let request = JsonRpcRequest::new(method, params, 1);
        let body = match serde_json::to_vec(&request) {
            Ok(body) => Bytes::from(body),
            Err(_) => return AdapterResponse::network_failure("request failed"),
        };

        tracing::debug!(provider = %endpoint.provider(), method = method, "rpc request");

        let mut response = self.client.post_json(endpoint.url(), body).await;
        if response.ok && response.rpc_result().is_none() {
            response.ok = false;
        }
        response
    }

    /// Batched JSON-RPC call. `ok` requires every envelope in the reply to carry a result.
    pub async fn rpc_batch(
        &self,
        endpoint: &Endpoint,
        requests: &[JsonRpcRequest],
    ) -> AdapterResponse {
        let body = match serde_json::to_vec(requests) {
            Ok(body) => Bytes::from(body),
            Err(_) => return AdapterResponse::network_failure("request failed"),
        };

        tracing::debug!(
            provider = %endpoint.provider(),
            batch_size = requests.len(),
            "rpc batch request"
        );

        let mut response = self.client.post_json(endpoint.url(), body).await;
        if response.ok {
            response.ok = response.body.as_array().is_some_and(|items| {
                items.len() == requests.len() &&
                    items.iter().all(|item| {
                        !item.get("error").is_some_and(|e| !e.is_null()) &&
                            item.get("result").is_some_and(|r| !r.is_null())
                    })
            });
        }
        response
    }

    /// REST GET. The API key goes into the query string under the configured parameter,
    /// followed by `query` pairs.
    pub async fn rest_get(
        &self,
        endpoint: &Endpoint,
        route: Option<&str>,
        query: &[(&str, &str)],
    ) -> AdapterResponse {
        let url = match rest_url(endpoint, route, query) {
            Some(url) => url,
            None => return AdapterResponse::network_failure("request failed"),
        };

        tracing::debug!(provider = %endpoint.provider(), path = url.path(), "rest request");

        self.client.get(&url).await
    }

    /// GraphQL POST of `{query, variables}`. `ok` requires `data` and no `errors`.
    pub async fn graphql(
        &self,
        endpoint: &Endpoint,
        query: &str,
        variables: Value,
    ) -> AdapterResponse {
        let payload = json!({ "query": query, "variables": variables });
        let body = match serde_json::to_vec(&payload) {
            Ok(body) => Bytes::from(body),
            Err(_) => return AdapterResponse::network_failure("request failed"),
        };

        tracing::debug!(provider = %endpoint.provider(), "graphql request");

        let mut response = self.client.post_json(endpoint.url(), body).await;
        if response.ok {
            let has_errors = response
                .body
                .get("errors")
                .and_then(Value::as_array)
                .is_some_and(|errors| !errors.is_empty());
            let has_data = response.body.get("data").is_some_and(|d| !d.is_null());
            response.ok = has_data && !has_errors;
        }
        response
    }
}

/// Endpoint URL (or `route`, absolute or relative to it) with the API key and extra pairs
/// appended.
fn rest_url(endpoint: &Endpoint, route: Option<&str>, query: &[(&str, &str)]) -> Option<Url> {
    let mut url = match route {
        Some(route) => Url::parse(route).or_else(|_| endpoint.url().join(route)).ok()?,
        None => endpoint.url().clone(),
    };

    if endpoint.api_key().is_some() || !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        if let Some((param, key)) = endpoint.api_key() {
            pairs.append_pair(param, key);
        }
        for (name, value) in query {
            pairs.append_pair(name, value);
        }
    }

    Some(url)
}
