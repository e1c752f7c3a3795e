//! Test Helper Functions and Utilities
//!
//! Common helpers for building endpoint tables, ABI-encoded return data and adapters.

use rpcbench_core::{
    network::EndpointConfig, Chain, HttpClient, HttpClientConfig, NetworkConfig, ProtocolAdapter,
    ProviderId, Transport,
};
use std::sync::Arc;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

/// `balanceOf(address)` selector.
pub const BALANCE_OF: &str = "0x70a08231";
/// `symbol()` selector.
pub const SYMBOL: &str = "0x95d89b41";
/// `decimals()` selector.
pub const DECIMALS: &str = "0x313ce567";
/// `totalSupply()` selector.
pub const TOTAL_SUPPLY: &str = "0x18160ddd";

pub const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
pub const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

/// A single 32-byte return word.
#[must_use]
pub fn abi_word(value: u128) -> String {
    format!("0x{value:064x}")
}

/// ABI encoding of a dynamic `string` return value.
#[must_use]
pub fn abi_string(value: &str) -> String {
    let data: String = value.bytes().map(|b| format!("{b:02x}")).collect();
    let padded_len = value.len().div_ceil(32).max(1) * 64;
    format!("0x{:064x}{:064x}{data:0<padded_len$}", 32, value.len())
}

/// JSON-RPC endpoint row on Ethereum.
#[must_use]
pub fn rpc_endpoint(provider: ProviderId, url: &str) -> EndpointConfig {
    EndpointConfig::rpc(Chain::Ethereum, provider, url)
}

/// REST endpoint row on Ethereum with an API key and a unified portfolio route.
#[must_use]
pub fn rest_endpoint(provider: ProviderId, base_url: &str) -> EndpointConfig {
    let mut config = EndpointConfig::rpc(
        Chain::Ethereum,
        provider,
        format!("{base_url}/v1/eth-mainnet/block_v2/latest/"),
    )
    .with_transport(Transport::Rest);
    config.api_key = Some("test-key".to_string());
    config.height_pointer = Some("/data/items/0/height".to_string());
    config.portfolio_url = Some("/v1/{chain_id}/address/{wallet}/balances_v2/".to_string());
    config
}

#[must_use]
pub fn network(configs: &[EndpointConfig]) -> NetworkConfig {
    NetworkConfig::from_configs(configs).expect("endpoint table should be valid")
}

/// Adapter with short timeouts so unreachable endpoints fail fast.
#[must_use]
pub fn test_adapter() -> ProtocolAdapter {
    let config = HttpClientConfig {
        request_timeout_ms: 2_000,
        connect_timeout_ms: 1_000,
        ..HttpClientConfig::default()
    };
    ProtocolAdapter::new(Arc::new(HttpClient::with_config(config).expect("client should build")))
}

/// A TCP server that accepts connections and never answers.
///
/// Returns its base URL. The listener task lives until the runtime shuts down.
pub async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should succeed");
    let addr = listener.local_addr().expect("listener should have an address");

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}")
}

/// A node that answers single `eth_blockNumber` calls with `height` and leaves every other
/// request (batches included) hanging on an open connection.
pub async fn block_number_only_server(height: u64) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should succeed");
    let addr = listener.local_addr().expect("listener should have an address");

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(answer_block_number(socket, height));
        }
    });

    format!("http://{addr}")
}

async fn answer_block_number(mut socket: TcpStream, height: u64) {
    let mut buffer = Vec::new();
    while let Some(body) = read_http_body(&mut socket, &mut buffer).await {
        let text = String::from_utf8_lossy(&body);
        if !(text.starts_with('{') && text.contains("\"eth_blockNumber\"")) {
            std::future::pending::<()>().await;
        }

        let payload = format!(r#"{{"jsonrpc":"2.0","id":1,"result":"0x{height:x}"}}"#);
        let reply = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n",
            payload.len()
        ) + &payload;
        if socket.write_all(reply.as_bytes()).await.is_err() {
            return;
        }
    }
}

/// Reads one HTTP/1.1 request from `socket` and returns its body. Bytes past the request
/// stay in `buffer` for the next call.
async fn read_http_body(socket: &mut TcpStream, buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(head_end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buffer[..head_end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let total = head_end + 4 + length;
            if buffer.len() >= total {
                let body = buffer[head_end + 4..total].to_vec();
                buffer.drain(..total);
                return Some(body);
            }
        }

        let read = socket.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
}
