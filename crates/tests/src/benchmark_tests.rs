//! Integration tests for full benchmark rounds.
//!
//! A round dispatches probes to every provider, reduces them into records, ranks them and
//! publishes one immutable snapshot. These tests check the published snapshot end to end.

use crate::mock_infrastructure::{network, rpc_endpoint, test_adapter, RpcMockBuilder};
use rpcbench_core::{
    network::EndpointConfig,
    probe::{Lag, PrecisionMode, ProbeDispatcher, ProbeSettings, RequestType, BATCH_PROBE_SIZE},
    scoring::{ScoringConfig, ScoringEngine},
    BenchmarkEngine, Chain, ProviderId,
};
use std::{sync::Arc, time::Duration};

struct Fixture {
    _fast: RpcMockBuilder,
    _behind: RpcMockBuilder,
    _broken: RpcMockBuilder,
    engine: BenchmarkEngine,
}

async fn fixture() -> Fixture {
    let mut fast = RpcMockBuilder::new().await;
    fast.mock_healthy_node(100, BATCH_PROBE_SIZE);
    let mut behind = RpcMockBuilder::new().await;
    behind.mock_healthy_node(98, BATCH_PROBE_SIZE);
    let mut broken = RpcMockBuilder::new().await;
    broken.mock_server_error();

    let network = network(&[
        rpc_endpoint(ProviderId::Alchemy, &fast.url()),
        rpc_endpoint(ProviderId::Ankr, &behind.url()),
        EndpointConfig::rpc(Chain::Polygon, ProviderId::Infura, "https://polygon.example/"),
        rpc_endpoint(ProviderId::Chainstack, &broken.url()),
    ]);

    let dispatcher = ProbeDispatcher::new(
        test_adapter(),
        ProbeSettings {
            precision: PrecisionMode::Standard,
            request_type: RequestType::Light,
            inter_round_pause: Duration::from_millis(1),
            round_deadline: Duration::from_secs(10),
        },
    );

    let engine = BenchmarkEngine::new(
        Arc::new(network),
        Chain::Ethereum,
        dispatcher,
        Arc::new(ScoringEngine::new(ScoringConfig::default())),
        20,
    );

    Fixture { _fast: fast, _behind: behind, _broken: broken, engine }
}

#[tokio::test]
async fn test_initial_snapshot_lists_every_provider_unmeasured() {
    let fixture = fixture().await;
    let snapshot = fixture.engine.leaderboard().snapshot();

    assert_eq!(snapshot.round, 0);
    assert!(snapshot.completed_at.is_none());
    assert!(snapshot.winner.is_placeholder());
    assert_eq!(
        fixture.engine.providers(),
        &[ProviderId::Alchemy, ProviderId::Ankr, ProviderId::Infura, ProviderId::Chainstack]
    );
    assert!(snapshot.records.iter().all(|r| r.score == 0 && r.history.is_empty()));
}

#[tokio::test]
async fn test_round_publishes_ranked_snapshot() {
    let fixture = fixture().await;

    let snapshot = fixture.engine.run_round().await;

    assert_eq!(snapshot.round, 1);
    assert!(snapshot.completed_at.is_some());
    assert_eq!(snapshot.records.len(), 4);
    assert!(
        snapshot.records.windows(2).all(|pair| pair[0].score >= pair[1].score),
        "records must be sorted by score"
    );

    let alchemy = snapshot.record(ProviderId::Alchemy).unwrap();
    let ankr = snapshot.record(ProviderId::Ankr).unwrap();
    assert_eq!(alchemy.lag, Lag::Blocks(0));
    assert_eq!(ankr.lag, Lag::Blocks(2));
    assert_eq!(alchemy.uptime, 100);
    assert_eq!(alchemy.archive, Some(true));
    assert_eq!(alchemy.block_height, Some(100));

    let winner = snapshot.winner.provider.expect("a measurable provider should win");
    assert!(matches!(winner, ProviderId::Alchemy | ProviderId::Ankr));
}

#[tokio::test]
async fn test_unsupported_and_failed_providers_in_round() {
    let fixture = fixture().await;

    let snapshot = fixture.engine.run_round().await;

    let infura = snapshot.record(ProviderId::Infura).unwrap();
    assert_eq!(infura.transport, None);
    assert_eq!(infura.score, 30);
    assert_eq!(infura.lag, Lag::NotAvailable);
    assert_eq!(infura.security_score, 0);
    assert!(infura.history.is_empty());

    let chainstack = snapshot.record(ProviderId::Chainstack).unwrap();
    assert_eq!(chainstack.latency, 0);
    assert_eq!(chainstack.uptime, 0);
    assert_eq!(chainstack.lag, Lag::NotAvailable);
    assert_eq!(chainstack.history, vec![0, 0]);
    assert_eq!(chainstack.score, infura.score);
    assert!(snapshot.winner.provider != Some(ProviderId::Chainstack));
}

#[tokio::test]
async fn test_history_carries_over_and_old_snapshots_stay_intact() {
    let fixture = fixture().await;

    let first = fixture.engine.run_round().await;
    let second = fixture.engine.run_round().await;

    assert_eq!(first.round, 1);
    assert_eq!(second.round, 2);
    assert_eq!(first.record(ProviderId::Alchemy).unwrap().history.len(), 2);
    assert_eq!(second.record(ProviderId::Alchemy).unwrap().history.len(), 4);
    assert_eq!(fixture.engine.leaderboard().snapshot().round, 2);
}

#[tokio::test]
async fn test_overlapping_rounds_publish_consecutively() {
    let fixture = fixture().await;

    let (a, b) = tokio::join!(fixture.engine.run_round(), fixture.engine.run_round());

    let mut rounds = [a.round, b.round];
    rounds.sort_unstable();
    assert_eq!(rounds, [1, 2]);

    let latest = if a.round == 2 { &a } else { &b };
    assert_eq!(latest.record(ProviderId::Alchemy).unwrap().history.len(), 4);
    assert_eq!(fixture.engine.leaderboard().snapshot().round, 2);
}
