use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    network::{Chain, ProviderId},
    record::{ProviderRecord, Winner},
};

/// Results of one completed benchmark round.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    /// `0` before the first round completes.
    pub round: u64,
    pub chain: Chain,
    pub completed_at: Option<DateTime<Utc>>,
    /// Sorted by score, highest first.
    pub records: Vec<ProviderRecord>,
    pub winner: Winner,
}

impl LeaderboardSnapshot {
    /// Static metadata for every provider with nothing measured yet.
    #[must_use]
    pub fn initial(chain: Chain, providers: &[ProviderId]) -> Self {
        Self {
            round: 0,
            chain,
            completed_at: None,
            records: providers.iter().map(|id| ProviderRecord::unmeasured(*id)).collect(),
            winner: Winner::placeholder(),
        }
    }

    #[must_use]
    pub fn record(&self, id: ProviderId) -> Option<&ProviderRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// The published snapshot. Readers always see one complete round.
pub struct Leaderboard {
    current: ArcSwap<LeaderboardSnapshot>,
}

impl Leaderboard {
    #[must_use]
    pub fn new(initial: LeaderboardSnapshot) -> Self {
        Self { current: ArcSwap::from_pointee(initial) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<LeaderboardSnapshot> {
        self.current.load_full()
    }

    /// Replaces the snapshot wholesale.
    pub fn publish(&self, next: LeaderboardSnapshot) -> Arc<LeaderboardSnapshot> {
        let next = Arc::new(next);
        self.current.store(Arc::clone(&next));
        tracing::debug!(round = next.round, winner = %next.winner.name, "leaderboard published");
        next
    }
}
