use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Providers known to the engine.
///
/// The set is closed: every variant has a compiled-in [`ProviderProfile`], so display and cost
/// metadata can never be missing for a configured endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Alchemy,
    Infura,
    QuickNode,
    Ankr,
    Chainstack,
    Covalent,
    TheGraph,
}

/// Static metadata about a provider's commercial offering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProfile {
    pub display_name: &'static str,
    pub color: &'static str,
    pub free_tier: &'static str,
    pub archive_support: bool,
    pub trace_support: bool,
    pub certifications: &'static [&'static str],
    /// USD per million requests on the entry paid plan.
    pub base_cost_per_million: f64,
    pub chain_count: u32,
    /// Billing units charged for one typical call (compute units, credits, queries).
    pub cost_units_per_call: u32,
}

const ALCHEMY: ProviderProfile = ProviderProfile {
    display_name: "Alchemy",
    color: "#3b82f6",
    free_tier: "30M CU / month",
    archive_support: true,
    trace_support: true,
    certifications: &["SOC 2 Type II", "ISO 27001"],
    base_cost_per_million: 0.45,
    chain_count: 30,
    cost_units_per_call: 26,
};

const INFURA: ProviderProfile = ProviderProfile {
    display_name: "Infura",
    color: "#f97316",
    free_tier: "3M credits / day",
    archive_support: true,
    trace_support: true,
    certifications: &["SOC 2 Type II"],
    base_cost_per_million: 1.5,
    chain_count: 17,
    cost_units_per_call: 80,
};

const QUICKNODE: ProviderProfile = ProviderProfile {
    display_name: "QuickNode",
    color: "#14b8a6",
    free_tier: "10M credits / month",
    archive_support: true,
    trace_support: true,
    certifications: &["SOC 1 Type II", "SOC 2 Type II", "ISO 27001"],
    base_cost_per_million: 0.62,
    chain_count: 60,
    cost_units_per_call: 20,
};

const ANKR: ProviderProfile = ProviderProfile {
    display_name: "Ankr",
    color: "#2563eb",
    free_tier: "Public RPC, rate limited",
    archive_support: true,
    trace_support: false,
    certifications: &[],
    base_cost_per_million: 0.1,
    chain_count: 70,
    cost_units_per_call: 1,
};

const CHAINSTACK: ProviderProfile = ProviderProfile {
    display_name: "Chainstack",
    color: "#6366f1",
    free_tier: "3M requests / month",
    archive_support: true,
    trace_support: true,
    certifications: &["SOC 2 Type II", "ISO 27001"],
    base_cost_per_million: 0.5,
    chain_count: 25,
    cost_units_per_call: 1,
};

const COVALENT: ProviderProfile = ProviderProfile {
    display_name: "Covalent",
    color: "#ff4c8b",
    free_tier: "25K credits / month",
    archive_support: true,
    trace_support: false,
    certifications: &["SOC 2 Type II"],
    base_cost_per_million: 4.0,
    chain_count: 100,
    cost_units_per_call: 1,
};

const THEGRAPH: ProviderProfile = ProviderProfile {
    display_name: "The Graph",
    color: "#6f4cff",
    free_tier: "100K queries / month",
    archive_support: false,
    trace_support: false,
    certifications: &[],
    base_cost_per_million: 4.0,
    chain_count: 40,
    cost_units_per_call: 1,
};

impl ProviderId {
    pub const ALL: [ProviderId; 7] = [
        ProviderId::Alchemy,
        ProviderId::Infura,
        ProviderId::QuickNode,
        ProviderId::Ankr,
        ProviderId::Chainstack,
        ProviderId::Covalent,
        ProviderId::TheGraph,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alchemy => "alchemy",
            Self::Infura => "infura",
            Self::QuickNode => "quicknode",
            Self::Ankr => "ankr",
            Self::Chainstack => "chainstack",
            Self::Covalent => "covalent",
            Self::TheGraph => "thegraph",
        }
    }

    #[must_use]
    pub const fn profile(self) -> &'static ProviderProfile {
        match self {
            Self::Alchemy => &ALCHEMY,
            Self::Infura => &INFURA,
            Self::QuickNode => &QUICKNODE,
            Self::Ankr => &ANKR,
            Self::Chainstack => &CHAINSTACK,
            Self::Covalent => &COVALENT,
            Self::TheGraph => &THEGRAPH,
        }
    }

    /// Whether the provider exposes Alchemy's `alchemy_*` enhanced token APIs.
    #[must_use]
    pub const fn has_enhanced_token_api(self) -> bool {
        matches!(self, Self::Alchemy)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown provider '{s}'"))
    }
}
