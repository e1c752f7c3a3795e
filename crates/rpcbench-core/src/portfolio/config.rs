use serde::{Deserialize, Serialize};

use crate::network::Chain;

/// Portfolio benchmark configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Wallet whose holdings every scenario loads.
    #[serde(default = "default_wallet")]
    pub wallet: String,

    #[serde(default)]
    pub chain: Chain,

    /// ERC-20 contracts probed by raw RPC scenarios.
    #[serde(default = "default_tracked_tokens")]
    pub tracked_tokens: Vec<String>,

    /// Time to interactive above which a scenario loses points. Defaults to `500`.
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
}

fn default_wallet() -> String {
    "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".to_string()
}

/// USDC, USDT, DAI and WETH on mainnet.
fn default_tracked_tokens() -> Vec<String> {
    [
        "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
        "0xdAC17F958D2ee523a2206206994597C13D831ec7",
        "0x6B175474E89094C44Da98b954EedeAC495271d0F",
        "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_latency_budget_ms() -> u64 {
    500
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            wallet: default_wallet(),
            chain: Chain::Ethereum,
            tracked_tokens: default_tracked_tokens(),
            latency_budget_ms: default_latency_budget_ms(),
        }
    }
}
