//! Mock Infrastructure for Testing rpcbench
//!
//! Reusable mock providers for exercising the probe, consensus and portfolio pipelines
//! without real network connections.
//!
//! ## Components
//!
//! - `RpcMockBuilder`: Wraps mockito to serve JSON-RPC, REST and GraphQL replies
//! - Test helpers for endpoint tables, ABI return data and unresponsive servers
//!
//! ## Usage
//!
//! ```ignore
//! use tests::mock_infrastructure::{rpc_endpoint, RpcMockBuilder};
//!
//! let mut mock = RpcMockBuilder::new().await;
//! mock.mock_healthy_node(100, 10);
//!
//! let row = rpc_endpoint(ProviderId::Ankr, &mock.url());
//! ```

pub mod rpc_mock;
pub mod test_helpers;

pub use rpc_mock::RpcMockBuilder;
pub use test_helpers::*;
