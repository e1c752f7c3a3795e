use thiserror::Error;

use crate::network::{Chain, ProviderId};

/// Errors surfaced by the engine.
///
/// Transport failures inside a benchmark round never reach callers as `Err`: the dispatcher
/// records them as failed samples. This type covers configuration, client construction and the
/// scenario pipelines, where a failure is captured per provider.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BenchError {
    /// Request exceeded the configured timeout duration.
    #[error("Request timeout")]
    Timeout,

    /// Failed to establish a connection, or the connection failed mid-request.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP-level error occurred (non-2xx status code).
    #[error("HTTP error: {0}")]
    HttpError(u16, String),

    /// JSON-RPC error returned by the provider.
    #[error("RPC error {0}: {1}")]
    RpcError(i32, String),

    /// Response arrived but could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The provider has no endpoint configured for the chain.
    #[error("{provider} has no endpoint for {chain}")]
    Unsupported { provider: ProviderId, chain: Chain },

    /// The endpoint table contains an unusable row.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Not a 20-byte hex address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Parameters do not match the ABI method's signature.
    #[error("Invalid call: {0}")]
    InvalidCall(String),

    /// No consensus target is registered for the chain and asset class.
    #[error("No consensus target for {asset} on {chain}")]
    MissingTarget { chain: Chain, asset: String },

    /// HTTP client could not be built.
    #[error("Client build failed: {0}")]
    ClientBuild(String),
}

impl BenchError {
    /// Returns `true` if this error is transient and retrying later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::ConnectionFailed(_) => true,
            Self::HttpError(status, _) => *status >= 500 || *status == 429,
            Self::RpcError(code, _) => *code == -32005 || *code == -32603,
            _ => false,
        }
    }
}
