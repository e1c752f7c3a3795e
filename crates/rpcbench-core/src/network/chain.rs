use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Networks the engine can benchmark.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    #[default]
    Ethereum,
    Polygon,
    Arbitrum,
    Optimism,
    Base,
}

impl Chain {
    pub const ALL: [Chain; 5] =
        [Chain::Ethereum, Chain::Polygon, Chain::Arbitrum, Chain::Optimism, Chain::Base];

    /// EIP-155 chain id.
    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Polygon => 137,
            Self::Arbitrum => 42161,
            Self::Optimism => 10,
            Self::Base => 8453,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Polygon => "polygon",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
            Self::Base => "base",
        }
    }

    /// Symbol of the gas token, used to label the native balance in portfolio scans.
    #[must_use]
    pub const fn native_symbol(self) -> &'static str {
        match self {
            Self::Polygon => "POL",
            Self::Ethereum | Self::Arbitrum | Self::Optimism | Self::Base => "ETH",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|chain| chain.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown chain '{s}'"))
    }
}
