//! Composite provider scoring.
//!
//! Each factor maps a measurement onto `0..=100`; the composite is their weighted sum,
//! rounded. The engine also estimates cost at a configured request volume and picks the
//! round's winner.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    network::ProviderProfile,
    probe::Lag,
    record::{ProviderRecord, Winner},
};

/// Configuration for the scoring system (`[scoring]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Factor weights
    #[serde(default)]
    pub weights: ScoringWeights,

    /// Monthly volume, in millions of requests, used for cost estimates (default: 10)
    #[serde(default = "default_request_volume_millions")]
    pub request_volume_millions: f64,
}

fn default_request_volume_millions() -> f64 {
    10.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { weights: ScoringWeights::default(), request_volume_millions: 10.0 }
    }
}

/// Weights for each scoring factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// P50 latency factor weight (default: 0.4)
    #[serde(default = "default_latency_weight")]
    pub latency: f64,

    /// Uptime factor weight (default: 0.3)
    #[serde(default = "default_uptime_weight")]
    pub uptime: f64,

    /// Block lag factor weight (default: 0.15)
    #[serde(default = "default_lag_weight")]
    pub lag: f64,

    /// P99 latency factor weight (default: 0.15)
    #[serde(default = "default_p99_weight")]
    pub p99: f64,
}

fn default_latency_weight() -> f64 {
    0.4
}
fn default_uptime_weight() -> f64 {
    0.3
}
fn default_lag_weight() -> f64 {
    0.15
}
fn default_p99_weight() -> f64 {
    0.15
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self { latency: 0.4, uptime: 0.3, lag: 0.15, p99: 0.15 }
    }
}

impl ScoringWeights {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.latency + self.uptime + self.lag + self.p99
    }
}

/// Measurements that feed the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInputs {
    pub latency: u64,
    pub p99: u64,
    pub uptime: u8,
    pub lag: Lag,
}

/// Individual factor values, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreFactors {
    pub latency: f64,
    pub uptime: f64,
    pub lag: f64,
    pub p99: f64,
}

/// Scoring engine with hot-swappable configuration.
pub struct ScoringEngine {
    config: ArcSwap<ScoringConfig>,
}

impl ScoringEngine {
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self { config: ArcSwap::from_pointee(config) }
    }

    #[must_use]
    pub fn config(&self) -> Arc<ScoringConfig> {
        self.config.load_full()
    }

    pub fn update_config(&self, config: ScoringConfig) {
        self.config.store(Arc::new(config));
    }

    /// `max(0, 100 - latency / 4)`, with `0` (no successful round) scoring `0`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn calculate_latency_factor(latency_ms: u64) -> f64 {
        if latency_ms == 0 {
            return 0.0;
        }
        (100.0 - latency_ms as f64 / 4.0).max(0.0)
    }

    #[must_use]
    pub fn calculate_uptime_factor(uptime: u8) -> f64 {
        f64::from(uptime.min(100))
    }

    /// `max(0, 100 - blocks * 10)`; non-numeric lag carries no penalty.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn calculate_lag_factor(lag: Lag) -> f64 {
        (100.0 - lag.blocks() as f64 * 10.0).max(0.0)
    }

    /// `max(0, 100 - p99 / 4)`. A zero p99 scores the full 100.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn calculate_p99_factor(p99_ms: u64) -> f64 {
        (100.0 - p99_ms as f64 / 4.0).max(0.0)
    }

    #[must_use]
    pub fn factors(inputs: &ScoreInputs) -> ScoreFactors {
        ScoreFactors {
            latency: Self::calculate_latency_factor(inputs.latency),
            uptime: Self::calculate_uptime_factor(inputs.uptime),
            lag: Self::calculate_lag_factor(inputs.lag),
            p99: Self::calculate_p99_factor(inputs.p99),
        }
    }

    /// Weighted composite, rounded to the nearest integer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn score(&self, inputs: &ScoreInputs) -> u32 {
        let weights = &self.config.load().weights;
        let factors = Self::factors(inputs);

        let composite = weights.latency * factors.latency +
            weights.uptime * factors.uptime +
            weights.lag * factors.lag +
            weights.p99 * factors.p99;

        composite.round().max(0.0) as u32
    }

    /// `round(base_cost_per_million * request_volume_millions)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn estimated_cost(&self, profile: &ProviderProfile) -> u64 {
        let volume = self.config.load().request_volume_millions;
        (profile.base_cost_per_million * volume).round().max(0.0) as u64
    }

    /// Highest score among providers with a nonzero latency. Ties go to the earlier record,
    /// so callers pass records in configuration order.
    #[must_use]
    pub fn select_winner(records: &[ProviderRecord]) -> Winner {
        let mut best: Option<&ProviderRecord> = None;
        for record in records.iter().filter(|r| r.latency > 0) {
            if best.map_or(true, |b| record.score > b.score) {
                best = Some(record);
            }
        }

        best.map_or_else(Winner::placeholder, |record| Winner {
            name: record.name.to_string(),
            provider: Some(record.id),
            score: record.score,
        })
    }

    /// Sorts records by score, highest first. Equal scores keep their relative order.
    pub fn rank(records: &mut [ProviderRecord]) {
        records.sort_by(|a, b| b.score.cmp(&a.score));
    }
}
