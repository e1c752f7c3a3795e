use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    network::Chain,
    utils::abi::{AbiMethod, AbiParam},
};

/// Token standard a consensus target represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// ERC-20.
    Fungible,
    /// ERC-721.
    NonFungible,
    /// ERC-1155.
    MultiToken,
}

impl AssetClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fungible => "fungible",
            Self::NonFungible => "non_fungible",
            Self::MultiToken => "multi_token",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "fungible" | "erc20" => Ok(Self::Fungible),
            "non_fungible" | "erc721" => Ok(Self::NonFungible),
            "multi_token" | "erc1155" => Ok(Self::MultiToken),
            other => Err(format!("unknown asset class '{other}'")),
        }
    }
}

/// One row of the `[[consensus.targets]]` registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusTarget {
    pub chain: Chain,
    pub asset: AssetClass,
    pub contract: String,
    pub method: AbiMethod,
    #[serde(default)]
    pub params: Vec<AbiParam>,
}

impl ConsensusTarget {
    fn new(chain: Chain, asset: AssetClass, contract: &str, method: AbiMethod) -> Self {
        Self { chain, asset, contract: contract.to_string(), method, params: Vec::new() }
    }

    fn with_params(mut self, params: Vec<AbiParam>) -> Self {
        self.params = params;
        self
    }
}

/// Consensus validation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Registered targets. Replaces the built-in registry when set.
    #[serde(default = "default_targets")]
    pub targets: Vec<ConsensusTarget>,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self { targets: default_targets() }
    }
}

impl ConsensusConfig {
    #[must_use]
    pub fn target(&self, chain: Chain, asset: AssetClass) -> Option<&ConsensusTarget> {
        self.targets.iter().find(|t| t.chain == chain && t.asset == asset)
    }
}

/// Well-known contracts per chain: USDC supply, BAYC supply and an `OpenSea` storefront balance.
fn default_targets() -> Vec<ConsensusTarget> {
    use AssetClass::{Fungible, MultiToken, NonFungible};

    vec![
        ConsensusTarget::new(
            Chain::Ethereum,
            Fungible,
            "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            AbiMethod::TotalSupply,
        ),
        ConsensusTarget::new(
            Chain::Ethereum,
            NonFungible,
            "0xBC4CA0EdA7647A8aB7C2061c2E118A18a936f13D",
            AbiMethod::TotalSupply,
        ),
        ConsensusTarget::new(
            Chain::Ethereum,
            MultiToken,
            "0x495f947276749Ce646f68AC8c248420045cb7b5e",
            AbiMethod::BalanceOfToken,
        )
        .with_params(vec![
            AbiParam::Address("0x000000000000000000000000000000000000dEaD".to_string()),
            AbiParam::Uint(1),
        ]),
        ConsensusTarget::new(
            Chain::Polygon,
            Fungible,
            "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174",
            AbiMethod::TotalSupply,
        ),
        ConsensusTarget::new(
            Chain::Arbitrum,
            Fungible,
            "0xaf88d065e77c8cC2239327C5EDb3A432268e5831",
            AbiMethod::TotalSupply,
        ),
        ConsensusTarget::new(
            Chain::Optimism,
            Fungible,
            "0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85",
            AbiMethod::TotalSupply,
        ),
        ConsensusTarget::new(
            Chain::Base,
            Fungible,
            "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
            AbiMethod::TotalSupply,
        ),
    ]
}
