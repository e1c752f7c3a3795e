use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use super::{Chain, ProviderId};
use crate::adapters::BenchError;

/// Wire protocol an endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Rpc,
    Rest,
    #[serde(rename = "graphql")]
    GraphQl,
}

impl Transport {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rpc => "rpc",
            Self::Rest => "rest",
            Self::GraphQl => "graphql",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GraphQL document used for block-height probes when none is configured.
pub const DEFAULT_GRAPHQL_HEIGHT_QUERY: &str = "{ _meta { block { number } } }";

/// JSON pointer to the block height in a default GraphQL height response.
pub const DEFAULT_GRAPHQL_HEIGHT_POINTER: &str = "/data/_meta/block/number";

/// JSON pointer to the block height in a default REST height response.
pub const DEFAULT_REST_HEIGHT_POINTER: &str = "/data/items/0/height";

fn default_api_key_param() -> String {
    "key".to_string()
}

/// One row of the `[[networks.endpoints]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub chain: Chain,
    pub provider: ProviderId,
    pub url: String,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Query-string parameter carrying the API key on REST endpoints.
    #[serde(default = "default_api_key_param")]
    pub api_key_param: String,
    /// JSON pointer (RFC 6901) to the block height in REST/GraphQL responses.
    #[serde(default)]
    pub height_pointer: Option<String>,
    #[serde(default)]
    pub graphql_query: Option<String>,
    /// REST route for the unified wallet balance call. `{wallet}` and `{chain_id}` are
    /// substituted.
    #[serde(default)]
    pub portfolio_url: Option<String>,
    /// GraphQL document for the unified wallet query. Receives `$wallet` as a variable.
    #[serde(default)]
    pub portfolio_query: Option<String>,
}

impl EndpointConfig {
    /// Minimal JSON-RPC endpoint.
    #[must_use]
    pub fn rpc(chain: Chain, provider: ProviderId, url: impl Into<String>) -> Self {
        Self {
            chain,
            provider,
            url: url.into(),
            transport: Transport::Rpc,
            api_key: None,
            api_key_param: default_api_key_param(),
            height_pointer: None,
            graphql_query: None,
            portfolio_url: None,
            portfolio_query: None,
        }
    }

    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }
}

/// A validated endpoint with its URL already parsed.
#[derive(Debug, Clone)]
pub struct Endpoint {
    config: EndpointConfig,
    url: Url,
}

impl Endpoint {
    /// Parses and validates a configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidEndpoint`] if the URL does not parse or a JSON pointer
    /// does not start with `/`.
    pub fn from_config(config: EndpointConfig) -> Result<Self, BenchError> {
        let url = Url::parse(&config.url).map_err(|e| {
            BenchError::InvalidEndpoint(format!(
                "{}/{}: invalid url: {e}",
                config.chain, config.provider
            ))
        })?;

        if let Some(pointer) = &config.height_pointer {
            if !pointer.is_empty() && !pointer.starts_with('/') {
                return Err(BenchError::InvalidEndpoint(format!(
                    "{}/{}: height_pointer must start with '/'",
                    config.chain, config.provider
                )));
            }
        }

        Ok(Self { config, url })
    }

    #[must_use]
    pub fn chain(&self) -> Chain {
        self.config.chain
    }

    #[must_use]
    pub fn provider(&self) -> ProviderId {
        self.config.provider
    }

    #[must_use]
    pub fn transport(&self) -> Transport {
        self.config.transport
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    #[must_use]
    pub fn api_key(&self) -> Option<(&str, &str)> {
        self.config.api_key.as_deref().map(|key| (self.config.api_key_param.as_str(), key))
    }

    /// `https` and `wss` count as secure transport.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        matches!(self.url.scheme(), "https" | "wss")
    }

    /// Pointer to the block height in REST/GraphQL height responses.
    #[must_use]
    pub fn height_pointer(&self) -> Option<&str> {
        match (self.config.height_pointer.as_deref(), self.config.transport) {
            (Some(pointer), _) => Some(pointer),
            (None, Transport::Rest) => Some(DEFAULT_REST_HEIGHT_POINTER),
            (None, Transport::GraphQl) => Some(DEFAULT_GRAPHQL_HEIGHT_POINTER),
            (None, Transport::Rpc) => None,
        }
    }

    #[must_use]
    pub fn graphql_height_query(&self) -> &str {
        self.config.graphql_query.as_deref().unwrap_or(DEFAULT_GRAPHQL_HEIGHT_QUERY)
    }
}

/// Result of looking up a provider on the active chain.
#[derive(Debug, Clone, Copy)]
pub enum EndpointLookup<'a> {
    Configured(&'a Endpoint),
    /// The provider has no endpoint on this chain. Never resolved to another chain's endpoint.
    Unsupported,
}

impl<'a> EndpointLookup<'a> {
    #[must_use]
    pub fn endpoint(self) -> Option<&'a Endpoint> {
        match self {
            Self::Configured(endpoint) => Some(endpoint),
            Self::Unsupported => None,
        }
    }
}

/// The endpoint table keyed by `(chain, provider)`, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct NetworkConfig {
    endpoints: Vec<Endpoint>,
}

impl NetworkConfig {
    /// Builds the table from configured rows.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidEndpoint`] for an unparsable row or a duplicated
    /// `(chain, provider)` pair.
    pub fn from_configs(configs: &[EndpointConfig]) -> Result<Self, BenchError> {
        let mut endpoints: Vec<Endpoint> = Vec::with_capacity(configs.len());

        for config in configs {
            if endpoints
                .iter()
                .any(|e| e.chain() == config.chain && e.provider() == config.provider)
            {
                return Err(BenchError::InvalidEndpoint(format!(
                    "duplicate endpoint for {}/{}",
                    config.chain, config.provider
                )));
            }
            endpoints.push(Endpoint::from_config(config.clone())?);
        }

        Ok(Self { endpoints })
    }

    #[must_use]
    pub fn lookup(&self, chain: Chain, provider: ProviderId) -> EndpointLookup<'_> {
        self.endpoints
            .iter()
            .find(|e| e.chain() == chain && e.provider() == provider)
            .map_or(EndpointLookup::Unsupported, EndpointLookup::Configured)
    }

    /// Every provider that appears anywhere in the table, in first-seen order.
    ///
    /// A provider configured only on other chains still appears, so it is reported as
    /// unsupported on the active chain instead of silently vanishing.
    #[must_use]
    pub fn providers(&self) -> Vec<ProviderId> {
        let mut roster = Vec::new();
        for endpoint in &self.endpoints {
            if !roster.contains(&endpoint.provider()) {
                roster.push(endpoint.provider());
            }
        }
        roster
    }

    #[must_use]
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
