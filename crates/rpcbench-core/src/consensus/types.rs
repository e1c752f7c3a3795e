use serde::Serialize;

use super::{AssetClass, ConsensusTarget};
use crate::{
    adapters::BenchError,
    network::{Chain, ProviderId},
    utils::abi::{encode_call, AbiMethod},
};

/// A target with its call data encoded once for every provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusQuery {
    pub target: ConsensusTarget,
    pub data: String,
}

impl ConsensusQuery {
    /// # Errors
    ///
    /// Returns an error when the target's parameters do not encode.
    pub fn new(target: ConsensusTarget) -> Result<Self, BenchError> {
        let data = encode_call(target.method, &target.params)?;
        Ok(Self { target, data })
    }
}

/// One provider's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusVote {
    pub provider: ProviderId,
    pub name: &'static str,
    pub success: bool,
    /// Decoded value; `None` for excluded votes.
    pub result: Option<String>,
    pub is_mismatch: bool,
    pub latency_ms: u64,
}

impl ConsensusVote {
    #[must_use]
    pub fn excluded(provider: ProviderId, latency_ms: u64) -> Self {
        Self {
            provider,
            name: provider.profile().display_name,
            success: false,
            result: None,
            is_mismatch: false,
            latency_ms,
        }
    }

    #[must_use]
    pub fn counted(provider: ProviderId, value: String, latency_ms: u64) -> Self {
        Self {
            provider,
            name: provider.profile().display_name,
            success: true,
            result: Some(value),
            is_mismatch: false,
            latency_ms,
        }
    }
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusReport {
    pub chain: Chain,
    pub asset: AssetClass,
    pub contract: String,
    pub method: AbiMethod,
    /// Most common successful value, `None` when nobody succeeded.
    pub consensus: Option<String>,
    /// Number of votes matching the consensus.
    pub agreement: usize,
    /// Number of successful votes.
    pub participants: usize,
    pub votes: Vec<ConsensusVote>,
}

impl ConsensusReport {
    #[must_use]
    pub fn mismatches(&self) -> impl Iterator<Item = &ConsensusVote> {
        self.votes.iter().filter(|v| v.is_mismatch)
    }
}
