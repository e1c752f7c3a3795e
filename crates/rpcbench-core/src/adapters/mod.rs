//! Protocol adapters.
//!
//! Every wire call made by the engine goes through [`ProtocolAdapter`], which speaks JSON-RPC
//! (single and batched), REST and GraphQL over one shared [`HttpClient`] and reports the outcome
//! as an [`AdapterResponse`].

pub mod errors;
pub mod http_client;
pub mod protocol;
pub mod response;

pub use errors::BenchError;
pub use http_client::{HttpClient, HttpClientConfig};
pub use protocol::{LogicalRequest, ProtocolAdapter};
pub use response::{AdapterResponse, NETWORK_ERROR, UNSUPPORTED_ERROR};
