use serde::Serialize;

use crate::{
    network::{ProviderId, Transport},
    probe::Lag,
};

/// Name shown before any provider has produced a measurable round.
pub const PLACEHOLDER_WINNER: &str = "Ready";

/// One provider's row on the leaderboard.
///
/// Measured fields are produced together at the end of a round and never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub id: ProviderId,
    pub name: &'static str,
    pub color: &'static str,
    pub free_tier: &'static str,
    pub trace_support: bool,
    pub certifications: &'static [&'static str],
    pub chain_count: u32,
    /// `None` when the provider has no endpoint on the benchmarked chain.
    pub transport: Option<Transport>,

    /// P50 latency in ms, `0` when no round succeeded.
    pub latency: u64,
    pub p99: u64,
    pub uptime: u8,
    pub batch_latency: Option<u64>,
    pub lag: Lag,
    pub block_height: Option<u64>,
    pub archive: Option<bool>,
    /// Gas price in gwei.
    pub gas: Option<f64>,
    pub security_score: u8,
    pub security_issues: Vec<String>,
    pub history: Vec<u64>,
    pub score: u32,
    /// Estimated USD for the configured request volume.
    pub calculated_cost: u64,
}

impl ProviderRecord {
    /// A record with static metadata only, as shown before the first round completes.
    #[must_use]
    pub fn unmeasured(id: ProviderId) -> Self {
        let profile = id.profile();
        Self {
            id,
            name: profile.display_name,
            color: profile.color,
            free_tier: profile.free_tier,
            trace_support: profile.trace_support,
            certifications: profile.certifications,
            chain_count: profile.chain_count,
            transport: None,
            latency: 0,
            p99: 0,
            uptime: 0,
            batch_latency: None,
            lag: Lag::NotAvailable,
            block_height: None,
            archive: None,
            gas: None,
            security_score: 0,
            security_issues: Vec::new(),
            history: Vec::new(),
            score: 0,
            calculated_cost: 0,
        }
    }
}

/// The round's best provider, or the placeholder when nobody was measurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Winner {
    pub name: String,
    pub provider: Option<ProviderId>,
    pub score: u32,
}

impl Winner {
    #[must_use]
    pub fn placeholder() -> Self {
        Self { name: PLACEHOLDER_WINNER.to_string(), provider: None, score: 0 }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.provider.is_none()
    }
}

impl Default for Winner {
    fn default() -> Self {
        Self::placeholder()
    }
}
