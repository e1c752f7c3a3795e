//! RPC Mock Builder for provider benchmarking tests
//!
//! Wraps mockito so a test can stand up a fake JSON-RPC node, REST aggregator or GraphQL
//! indexer and point an endpoint row at it.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

use super::test_helpers::{abi_string, abi_word};

/// Matches a single-call JSON-RPC body for `method`. Batch payloads never match.
fn single_call(method: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::Regex(r"^\{".to_string()),
        Matcher::Regex(format!(r#""method"\s*:\s*"{method}""#)),
    ])
}

/// Matches an `eth_call` to `contract` whose calldata starts with `selector`.
fn contract_call(contract: &str, selector: &str) -> Matcher {
    Matcher::AllOf(vec![
        single_call("eth_call"),
        Matcher::Regex(format!(r#""to"\s*:\s*"{contract}""#)),
        Matcher::Regex(format!(r#""data"\s*:\s*"{selector}"#)),
    ])
}

fn envelope(result: &Value) -> String {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string()
}

/// Builder for creating mock provider responses.
///
/// Every matcher is disjoint from the others, so the order mocks are added in never matters.
pub struct RpcMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
    headers: Vec<(&'static str, String)>,
}

impl RpcMockBuilder {
    /// Creates a new RPC mock builder with a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new(), headers: Vec::new() }
    }

    /// Returns the URL of the mock server.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Adds a header to every response created after this call.
    pub fn with_response_header(&mut self, name: &'static str, value: &str) -> &mut Self {
        self.headers.push((name, value.to_string()));
        self
    }

    fn respond(
        &mut self,
        method: &str,
        path: Matcher,
        body: Matcher,
        status: usize,
        reply: String,
    ) {
        let mut mock = self
            .server
            .mock(method, path)
            .match_body(body)
            .with_status(status)
            .with_header("content-type", "application/json");
        for (name, value) in &self.headers {
            mock = mock.with_header(*name, value);
        }
        let mock = mock.with_body(reply).create();
        self.mocks.push(mock);
    }

    fn rpc_result(&mut self, matcher: Matcher, result: &Value) -> &mut Self {
        self.respond("POST", Matcher::Any, matcher, 200, envelope(result));
        self
    }

    /// Mocks an `eth_blockNumber` request.
    pub fn mock_block_number(&mut self, block_number: u64) -> &mut Self {
        self.rpc_result(single_call("eth_blockNumber"), &json!(format!("0x{block_number:x}")))
    }

    /// Mocks `eth_getBlockByNumber("latest", ..)`.
    pub fn mock_latest_block(&mut self, block_number: u64) -> &mut Self {
        let block = json!({
            "number": format!("0x{block_number:x}"),
            "hash": format!("0x{block_number:064x}"),
            "transactions": []
        });
        self.rpc_result(single_call("eth_getBlockByNumber"), &block)
    }

    /// Mocks a batch of `size` `eth_blockNumber` calls.
    pub fn mock_batch_block_number(&mut self, block_number: u64, size: usize) -> &mut Self {
        let replies: Vec<Value> = (1..=size)
            .map(|id| {
                json!({ "jsonrpc": "2.0", "id": id, "result": format!("0x{block_number:x}") })
            })
            .collect();
        self.respond(
            "POST",
            Matcher::Any,
            Matcher::Regex(r"^\[".to_string()),
            200,
            Value::Array(replies).to_string(),
        );
        self
    }

    /// Mocks every `eth_getBalance` request.
    pub fn mock_balance(&mut self, wei: u128) -> &mut Self {
        self.rpc_result(single_call("eth_getBalance"), &json!(format!("0x{wei:x}")))
    }

    /// Mocks `eth_gasPrice`.
    pub fn mock_gas_price(&mut self, wei: u128) -> &mut Self {
        self.rpc_result(single_call("eth_gasPrice"), &json!(format!("0x{wei:x}")))
    }

    /// Mocks an `eth_call` to `contract` with a single `uint256` return word.
    pub fn mock_call_uint(&mut self, contract: &str, selector: &str, value: u128) -> &mut Self {
        self.rpc_result(contract_call(contract, selector), &json!(abi_word(value)))
    }

    /// Mocks an `eth_call` to `contract` that returns an ABI-encoded string.
    pub fn mock_call_string(&mut self, contract: &str, selector: &str, value: &str) -> &mut Self {
        self.rpc_result(contract_call(contract, selector), &json!(abi_string(value)))
    }

    /// Mocks any `eth_call` with a raw hex result.
    pub fn mock_call_raw(&mut self, raw: &str) -> &mut Self {
        self.rpc_result(single_call("eth_call"), &json!(raw))
    }

    /// Mocks an arbitrary single-call method with `result`.
    pub fn mock_method(&mut self, method: &str, result: &Value) -> &mut Self {
        self.rpc_result(single_call(method), result)
    }

    /// Mocks the whole healthy-node probe set: height, batch, archive balance and gas.
    pub fn mock_healthy_node(&mut self, block_number: u64, batch_size: usize) -> &mut Self {
        self.mock_block_number(block_number)
            .mock_batch_block_number(block_number, batch_size)
            .mock_balance(0)
            .mock_gas_price(20_000_000_000)
    }

    /// Mocks an RPC error response.
    pub fn mock_rpc_error(&mut self, method: &str, code: i32, message: &str) -> &mut Self {
        let reply = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": code, "message": message }
        })
        .to_string();
        self.respond("POST", Matcher::Any, single_call(method), 200, reply);
        self
    }

    /// Mocks a GET under `path_prefix` returning `body`.
    pub fn mock_rest(&mut self, path_prefix: &str, body: &Value) -> &mut Self {
        self.respond(
            "GET",
            Matcher::Regex(format!("^{path_prefix}")),
            Matcher::Any,
            200,
            body.to_string(),
        );
        self
    }

    /// Mocks a GraphQL POST returning `data`.
    pub fn mock_graphql(&mut self, data: &Value) -> &mut Self {
        self.respond(
            "POST",
            Matcher::Any,
            Matcher::Regex(r#""query"\s*:"#.to_string()),
            200,
            json!({ "data": data }).to_string(),
        );
        self
    }

    /// Mocks a server error (500) for every request.
    pub fn mock_server_error(&mut self) -> &mut Self {
        let mock = self
            .server
            .mock("POST", Matcher::Any)
            .with_status(500)
            .with_body("Internal Server Error")
            .create();

        self.mocks.push(mock);
        self
    }
}
