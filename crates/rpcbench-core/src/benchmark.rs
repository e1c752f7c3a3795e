//! Round orchestration.
//!
//! One round probes every configured provider, reduces the samples, computes lag across the
//! pass, audits each endpoint, scores, and publishes the complete record list as a new
//! [`LeaderboardSnapshot`]. Nothing is published until every provider branch has finished.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    adapters::{BenchError, HttpClient, ProtocolAdapter},
    config::AppConfig,
    leaderboard::{Leaderboard, LeaderboardSnapshot},
    network::{Chain, NetworkConfig, ProviderId},
    probe::{
        compute_lags, HeightObservation, LatencyHistory, LatencyStats, ProbeDispatcher,
        ProbeOutcome, ProbeTarget, SecurityAuditor,
    },
    record::ProviderRecord,
    scoring::{ScoreInputs, ScoringEngine},
};

pub struct BenchmarkEngine {
    network: Arc<NetworkConfig>,
    chain: Chain,
    providers: Vec<ProviderId>,
    dispatcher: ProbeDispatcher,
    scoring: Arc<ScoringEngine>,
    leaderboard: Arc<Leaderboard>,
    history_size: usize,
    /// Held for a whole round so overlapping callers publish consecutive rounds.
    round_lock: Mutex<()>,
}

impl BenchmarkEngine {
    /// Engine over every provider in the endpoint table, in table order.
    #[must_use]
    pub fn new(
        network: Arc<NetworkConfig>,
        chain: Chain,
        dispatcher: ProbeDispatcher,
        scoring: Arc<ScoringEngine>,
        history_size: usize,
    ) -> Self {
        let providers = network.providers();
        let leaderboard =
            Arc::new(Leaderboard::new(LeaderboardSnapshot::initial(chain, &providers)));
        Self {
            network,
            chain,
            providers,
            dispatcher,
            scoring,
            leaderboard,
            history_size,
            round_lock: Mutex::new(()),
        }
    }

    /// # Errors
    ///
    /// Returns an error when the endpoint table is invalid or the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, BenchError> {
        let network = Arc::new(config.network_config()?);
        let client = Arc::new(HttpClient::with_config(config.http.clone())?);
        let dispatcher =
            ProbeDispatcher::new(ProtocolAdapter::new(client), config.probe_settings());
        let scoring = Arc::new(ScoringEngine::new(config.scoring.clone()));

        Ok(Self::new(
            network,
            config.benchmark.chain,
            dispatcher,
            scoring,
            config.benchmark.history_size,
        ))
    }

    #[must_use]
    pub fn chain(&self) -> Chain {
        self.chain
    }

    #[must_use]
    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    #[must_use]
    pub fn network(&self) -> &Arc<NetworkConfig> {
        &self.network
    }

    #[must_use]
    pub fn scoring(&self) -> &Arc<ScoringEngine> {
        &self.scoring
    }

    #[must_use]
    pub fn leaderboard(&self) -> &Arc<Leaderboard> {
        &self.leaderboard
    }

    /// Runs one full round and publishes its snapshot.
    ///
    /// Concurrent calls are serialized: each round builds on the snapshot the previous one
    /// published.
    pub async fn run_round(&self) -> Arc<LeaderboardSnapshot> {
        let _round = self.round_lock.lock().await;
        let outcomes = self.dispatcher.dispatch(&self.network, self.chain, &self.providers).await;

        let previous = self.leaderboard.snapshot();
        let mut records = self.build_records(&outcomes, &previous);

        let winner = ScoringEngine::select_winner(&records);
        ScoringEngine::rank(&mut records);

        info!(
            round = previous.round + 1,
            chain = %self.chain,
            providers = records.len(),
            winner = %winner.name,
            winner_score = winner.score,
            "benchmark round completed"
        );

        self.leaderboard.publish(LeaderboardSnapshot {
            round: previous.round + 1,
            chain: self.chain,
            completed_at: Some(Utc::now()),
            records,
            winner,
        })
    }

    /// Reduces outcomes into records, in outcome order. `previous` supplies history carryover.
    #[must_use]
    pub fn build_records(
        &self,
        outcomes: &[ProbeOutcome],
        previous: &LeaderboardSnapshot,
    ) -> Vec<ProviderRecord> {
        let stats: Vec<LatencyStats> =
            outcomes.iter().map(|o| LatencyStats::reduce(&o.samples)).collect();

        let observations: Vec<HeightObservation> = outcomes
            .iter()
            .zip(&stats)
            .map(|(o, s)| HeightObservation { height: o.block_height, uptime: s.uptime })
            .collect();
        let lags = compute_lags(&observations);

        outcomes
            .iter()
            .zip(stats)
            .zip(lags)
            .map(|((outcome, stats), lag)| {
                let security = SecurityAuditor::audit(&outcome.target, &outcome.headers);

                let prior = previous.record(outcome.provider).map_or(&[][..], |r| &r.history[..]);
                let mut history = LatencyHistory::from_previous(prior, self.history_size);
                history.extend(&outcome.samples);

                let score = self.scoring.score(&ScoreInputs {
                    latency: stats.p50,
                    p99: stats.p99,
                    uptime: stats.uptime,
                    lag,
                });

                let transport = match outcome.target {
                    ProbeTarget::Endpoint { transport, .. } => Some(transport),
                    ProbeTarget::Unsupported => None,
                };

                ProviderRecord {
                    transport,
                    latency: stats.p50,
                    p99: stats.p99,
                    uptime: stats.uptime,
                    batch_latency: outcome.batch_latency,
                    lag,
                    block_height: outcome.block_height,
                    archive: outcome.archive,
                    gas: outcome.gas_gwei,
                    security_score: security.score,
                    security_issues: security.issues,
                    history: history.to_vec(),
                    score,
                    calculated_cost: self.scoring.estimated_cost(outcome.provider.profile()),
                    ..ProviderRecord::unmeasured(outcome.provider)
                }
            })
            .collect()
    }
}
