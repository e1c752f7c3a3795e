//! Latency reduction.
//!
//! Samples are per-round latencies in milliseconds where `0` marks a failed round. Every
//! function here is pure: the same samples always reduce to the same statistics.

use serde::{Serialize, Serializer};
use std::{collections::VecDeque, fmt};

/// Default number of samples kept in a provider's rolling history.
pub const DEFAULT_HISTORY_SIZE: usize = 20;

/// Reduced statistics for one provider's round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LatencyStats {
    /// Median of successful samples (upper median for even counts).
    pub p50: u64,
    /// Largest successful sample. A small-sample tail proxy, not a true 99th percentile.
    pub p99: u64,
    /// Percentage of successful rounds, rounded to the nearest integer.
    pub uptime: u8,
    pub successes: usize,
    pub iterations: usize,
}

impl LatencyStats {
    #[must_use]
    pub fn reduce(samples: &[u64]) -> Self {
        let mut successes: Vec<u64> = samples.iter().copied().filter(|s| *s > 0).collect();
        successes.sort_unstable();

        let p50 = successes.get(successes.len() / 2).copied().unwrap_or(0);
        let p99 = successes.last().copied().unwrap_or(0);

        Self {
            p50,
            p99,
            uptime: uptime_percent(successes.len(), samples.len()),
            successes: successes.len(),
            iterations: samples.len(),
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn uptime_percent(successes: usize, iterations: usize) -> u8 {
    if iterations == 0 {
        return 0;
    }
    (successes as f64 / iterations as f64 * 100.0).round() as u8
}

/// Bounded sliding window of raw samples, oldest dropped first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyHistory {
    samples: VecDeque<u64>,
    capacity: usize,
}

impl LatencyHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { samples: VecDeque::with_capacity(capacity), capacity }
    }

    /// Seeds the window from a previous round's history.
    #[must_use]
    pub fn from_previous(previous: &[u64], capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        history.extend(previous);
        history
    }

    /// Appends a round's samples, failures included.
    pub fn extend(&mut self, samples: &[u64]) {
        for sample in samples {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            if self.capacity > 0 {
                self.samples.push_back(*sample);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<u64> {
        self.samples.iter().copied().collect()
    }
}

/// How far a provider trails the freshest provider in the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lag {
    Blocks(u64),
    /// Reachable but reported no height.
    Synced,
    /// Never reachable this round.
    NotAvailable,
}

impl Lag {
    /// Blocks behind, with non-numeric lag treated as zero.
    #[must_use]
    pub fn blocks(self) -> u64 {
        match self {
            Self::Blocks(n) => n,
            Self::Synced | Self::NotAvailable => 0,
        }
    }
}

impl fmt::Display for Lag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocks(n) => write!(f, "{n}"),
            Self::Synced => f.write_str("Synced"),
            Self::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Lag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Blocks(n) => serializer.serialize_u64(*n),
            Self::Synced => serializer.serialize_str("Synced"),
            Self::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Per-provider height observation fed into [`compute_lags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightObservation {
    pub height: Option<u64>,
    pub uptime: u8,
}

/// Lag for every observation against the highest positive height among them.
#[must_use]
pub fn compute_lags(observations: &[HeightObservation]) -> Vec<Lag> {
    let reference =
        observations.iter().filter_map(|o| o.height).filter(|h| *h > 0).max().unwrap_or(0);

    observations
        .iter()
        .map(|o| match o.height {
            Some(height) if height > 0 => Lag::Blocks(reference.saturating_sub(height)),
            _ if o.uptime == 0 => Lag::NotAvailable,
            _ => Lag::Synced,
        })
        .collect()
}
