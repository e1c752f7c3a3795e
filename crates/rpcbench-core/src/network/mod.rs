//! Provider, chain and endpoint model.
//!
//! - [`ProviderId`] / [`ProviderProfile`]: closed provider set with compiled-in metadata
//! - [`Chain`]: closed chain set with EIP-155 ids
//! - [`NetworkConfig`]: `(chain, provider) -> Endpoint | Unsupported`

pub mod chain;
pub mod endpoint;
pub mod provider;

pub use chain::Chain;
pub use endpoint::{Endpoint, EndpointConfig, EndpointLookup, NetworkConfig, Transport};
pub use provider::{ProviderId, ProviderProfile};
