//! Integration tests for the probe dispatcher.
//!
//! These tests run full probe branches against mock providers:
//! - Timed rounds record one sample per round, `0` for failures
//! - Auxiliary archive, gas and batch probes run only on JSON-RPC endpoints
//! - The round deadline abandons a hung provider without stalling the others
//! - A hung auxiliary check leaves its field unknown and keeps the timed samples
//! - Outcomes keep the caller's provider order

use crate::mock_infrastructure::{
    block_number_only_server, network, rest_endpoint, rpc_endpoint, silent_server, test_adapter,
    RpcMockBuilder,
};
use rpcbench_core::{
    network::EndpointConfig,
    probe::{PrecisionMode, ProbeDispatcher, ProbeSettings, RequestType, BATCH_PROBE_SIZE},
    Chain, ProviderId,
};
use serde_json::json;
use std::time::{Duration, Instant};

fn settings(precision: PrecisionMode, request_type: RequestType) -> ProbeSettings {
    ProbeSettings {
        precision,
        request_type,
        inter_round_pause: Duration::from_millis(1),
        round_deadline: Duration::from_secs(10),
    }
}

fn dispatcher(settings: ProbeSettings) -> ProbeDispatcher {
    ProbeDispatcher::new(test_adapter(), settings)
}

#[tokio::test]
async fn test_healthy_node_full_probe_set() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_healthy_node(100, BATCH_PROBE_SIZE);

    let network = network(&[rpc_endpoint(ProviderId::Alchemy, &mock.url())]);
    let dispatcher = dispatcher(settings(PrecisionMode::Standard, RequestType::Light));

    let outcomes = dispatcher.dispatch(&network, Chain::Ethereum, &[ProviderId::Alchemy]).await;
    let outcome = &outcomes[0];

    assert!(outcome.is_supported());
    assert_eq!(outcome.samples.len(), 2);
    assert!(outcome.samples.iter().all(|s| *s > 0), "samples: {:?}", outcome.samples);
    assert_eq!(outcome.block_height, Some(100));
    assert_eq!(outcome.archive, Some(true));
    assert!(outcome.gas_gwei.is_some_and(|g| (g - 20.0).abs() < 1e-9));
    assert!(outcome.batch_latency.is_some_and(|b| b > 0));
}

#[tokio::test]
async fn test_robust_precision_runs_five_rounds() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_healthy_node(7, BATCH_PROBE_SIZE);

    let network = network(&[rpc_endpoint(ProviderId::Ankr, &mock.url())]);
    let dispatcher = dispatcher(settings(PrecisionMode::Robust, RequestType::Light));

    let outcomes = dispatcher.dispatch(&network, Chain::Ethereum, &[ProviderId::Ankr]).await;

    assert_eq!(outcomes[0].samples.len(), 5);
    assert!(outcomes[0].samples.iter().all(|s| *s > 0));
}

#[tokio::test]
async fn test_heavy_request_reads_height_from_block_and_skips_batch() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_latest_block(200).mock_balance(1).mock_gas_price(1_000_000_000);

    let network = network(&[rpc_endpoint(ProviderId::Infura, &mock.url())]);
    let dispatcher = dispatcher(settings(PrecisionMode::Standard, RequestType::Heavy));

    let outcomes = dispatcher.dispatch(&network, Chain::Ethereum, &[ProviderId::Infura]).await;

    assert_eq!(outcomes[0].block_height, Some(200));
    assert_eq!(outcomes[0].batch_latency, None);
    assert!(outcomes[0].gas_gwei.is_some_and(|g| (g - 1.0).abs() < 1e-9));
}

#[tokio::test]
async fn test_archive_refusal_is_reported_as_false() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_block_number(50)
        .mock_batch_block_number(50, BATCH_PROBE_SIZE)
        .mock_gas_price(1)
        .mock_rpc_error("eth_getBalance", -32000, "missing trie node");

    let network = network(&[rpc_endpoint(ProviderId::QuickNode, &mock.url())]);
    let dispatcher = dispatcher(settings(PrecisionMode::Standard, RequestType::Light));

    let outcomes =
        dispatcher.dispatch(&network, Chain::Ethereum, &[ProviderId::QuickNode]).await;

    assert_eq!(outcomes[0].archive, Some(false));
    assert_eq!(outcomes[0].block_height, Some(50));
}

#[tokio::test]
async fn test_server_errors_record_zero_samples() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_server_error();

    let network = network(&[rpc_endpoint(ProviderId::Chainstack, &mock.url())]);
    let dispatcher = dispatcher(settings(PrecisionMode::Standard, RequestType::Light));

    let outcomes =
        dispatcher.dispatch(&network, Chain::Ethereum, &[ProviderId::Chainstack]).await;
    let outcome = &outcomes[0];

    assert_eq!(outcome.samples, vec![0, 0]);
    assert_eq!(outcome.block_height, None);
    // The node answered, just not with state.
    assert_eq!(outcome.archive, Some(false));
    assert_eq!(outcome.gas_gwei, None);
    assert_eq!(outcome.batch_latency, Some(0));
}

#[tokio::test]
async fn test_round_deadline_abandons_hung_provider() {
    let hung = silent_server().await;
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_healthy_node(10, BATCH_PROBE_SIZE);

    let network = network(&[
        rpc_endpoint(ProviderId::Alchemy, &hung),
        rpc_endpoint(ProviderId::Ankr, &mock.url()),
    ]);
    let dispatcher = dispatcher(ProbeSettings {
        round_deadline: Duration::from_millis(300),
        ..settings(PrecisionMode::Standard, RequestType::Light)
    });

    let started = Instant::now();
    let outcomes = dispatcher
        .dispatch(&network, Chain::Ethereum, &[ProviderId::Alchemy, ProviderId::Ankr])
        .await;

    assert!(started.elapsed() < Duration::from_millis(1_500));
    assert_eq!(outcomes[0].provider, ProviderId::Alchemy);
    assert_eq!(outcomes[0].samples, vec![0, 0]);
    assert_eq!(outcomes[0].archive, None);
    assert_eq!(outcomes[1].provider, ProviderId::Ankr);
    assert_eq!(outcomes[1].block_height, Some(10));
}

#[tokio::test]
async fn test_hung_auxiliary_checks_keep_timed_samples() {
    let node = block_number_only_server(42).await;

    let network = network(&[rpc_endpoint(ProviderId::Alchemy, &node)]);
    let dispatcher = dispatcher(ProbeSettings {
        round_deadline: Duration::from_millis(800),
        ..settings(PrecisionMode::Standard, RequestType::Light)
    });

    let started = Instant::now();
    let outcomes = dispatcher.dispatch(&network, Chain::Ethereum, &[ProviderId::Alchemy]).await;
    let outcome = &outcomes[0];

    assert!(started.elapsed() < Duration::from_millis(1_900));
    assert_eq!(outcome.samples.len(), 2);
    assert!(outcome.samples.iter().all(|s| *s > 0), "samples: {:?}", outcome.samples);
    assert_eq!(outcome.block_height, Some(42));
    assert_eq!(outcome.archive, None);
    assert_eq!(outcome.gas_gwei, None);
    assert_eq!(outcome.batch_latency, None);
}

#[tokio::test]
async fn test_outcomes_keep_provider_order_with_unsupported_rows() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_healthy_node(1, BATCH_PROBE_SIZE);

    let network = network(&[
        EndpointConfig::rpc(Chain::Polygon, ProviderId::Infura, "https://polygon.example/"),
        rpc_endpoint(ProviderId::Ankr, &mock.url()),
    ]);
    let dispatcher = dispatcher(settings(PrecisionMode::Standard, RequestType::Light));
    let providers = [ProviderId::Ankr, ProviderId::Infura, ProviderId::TheGraph];

    let outcomes = dispatcher.dispatch(&network, Chain::Ethereum, &providers).await;

    let order: Vec<ProviderId> = outcomes.iter().map(|o| o.provider).collect();
    assert_eq!(order, providers);
    assert!(outcomes[0].is_supported());
    assert!(!outcomes[1].is_supported());
    assert!(!outcomes[2].is_supported());
    assert!(outcomes[1].samples.is_empty());
}

#[tokio::test]
async fn test_rest_aggregator_height_from_pointer() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_rest(
        "/v1/eth-mainnet/block_v2/latest",
        &json!({ "data": { "items": [{ "height": 19_000_123 }] } }),
    );

    let network = network(&[rest_endpoint(ProviderId::Covalent, &mock.url())]);
    let dispatcher = dispatcher(settings(PrecisionMode::Standard, RequestType::Light));

    let outcomes = dispatcher.dispatch(&network, Chain::Ethereum, &[ProviderId::Covalent]).await;
    let outcome = &outcomes[0];

    assert!(outcome.samples.iter().all(|s| *s > 0));
    assert_eq!(outcome.block_height, Some(19_000_123));
    assert_eq!(outcome.archive, None);
    assert_eq!(outcome.gas_gwei, None);
    assert_eq!(outcome.batch_latency, None);
}
