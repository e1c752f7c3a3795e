//! Probing, reduction and auditing.
//!
//! [`ProbeDispatcher`] produces one [`ProbeOutcome`] per provider; [`stats`] reduces the raw
//! samples and computes lag across the pass; [`SecurityAuditor`] scores the endpoint.

pub mod dispatcher;
pub mod security;
pub mod stats;

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::network::{ProviderId, Transport};

pub use dispatcher::{ProbeDispatcher, ProbeSettings, BATCH_PROBE_SIZE};
pub use security::{SecurityAuditor, SecurityReport};
pub use stats::{compute_lags, HeightObservation, LatencyHistory, LatencyStats, Lag};

/// Number of timed rounds per provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionMode {
    #[default]
    Standard,
    Robust,
}

impl PrecisionMode {
    #[must_use]
    pub const fn rounds(self) -> usize {
        match self {
            Self::Standard => 2,
            Self::Robust => 5,
        }
    }
}

impl FromStr for PrecisionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "robust" => Ok(Self::Robust),
            other => Err(format!("unknown precision mode '{other}'")),
        }
    }
}

impl fmt::Display for PrecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::Robust => "robust",
        })
    }
}

/// Payload weight of each timed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// `eth_blockNumber`.
    #[default]
    Light,
    /// `eth_getBlockByNumber("latest", true)`.
    Heavy,
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "heavy" => Ok(Self::Heavy),
            other => Err(format!("unknown request type '{other}'")),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Heavy => "heavy",
        })
    }
}

/// What was probed for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTarget {
    /// No endpoint on the active chain; nothing was sent.
    Unsupported,
    Endpoint { transport: Transport, secure: bool },
}

/// Raw measurements for one provider in one pass.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub provider: ProviderId,
    pub target: ProbeTarget,
    /// Per-round latency in ms, `0` for a failed round.
    pub samples: Vec<u64>,
    /// Most recent height reported during the timed rounds.
    pub block_height: Option<u64>,
    pub archive: Option<bool>,
    pub gas_gwei: Option<f64>,
    pub batch_latency: Option<u64>,
    /// Headers of the last HTTP response received during the timed rounds.
    pub headers: BTreeMap<String, String>,
}

impl ProbeOutcome {
    #[must_use]
    pub fn unsupported(provider: ProviderId) -> Self {
        Self::failed(provider, ProbeTarget::Unsupported, 0)
    }

    /// Every round failed.
    #[must_use]
    pub fn failed(provider: ProviderId, target: ProbeTarget, rounds: usize) -> Self {
        Self {
            provider,
            target,
            samples: vec![0; rounds],
            block_height: None,
            archive: None,
            gas_gwei: None,
            batch_latency: None,
            headers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self.target, ProbeTarget::Unsupported)
    }
}
