//! Integration tests for the portfolio benchmark.
//!
//! Each provider loads the same wallet through the strategy its transport allows:
//! - Unified REST and GraphQL calls return the whole portfolio at once
//! - Raw RPC walks native balance, token balances and token metadata
//! - Enhanced RPC falls back to the raw walk when the enhanced API fails
//! - A failing provider is graded F without affecting the others

use crate::mock_infrastructure::{
    abi_word, network, rest_endpoint, rpc_endpoint, test_adapter, RpcMockBuilder, BALANCE_OF,
    DAI, DECIMALS, SYMBOL, USDC, WALLET,
};
use rpcbench_core::{
    network::EndpointConfig,
    portfolio::{Grade, PortfolioConfig, PortfolioEngine, PortfolioRecord},
    Chain, ProviderId, Transport,
};
use serde_json::json;

fn engine(tokens: &[&str]) -> PortfolioEngine {
    PortfolioEngine::new(
        test_adapter(),
        PortfolioConfig {
            wallet: WALLET.to_string(),
            chain: Chain::Ethereum,
            tracked_tokens: tokens.iter().map(ToString::to_string).collect(),
            latency_budget_ms: 5_000,
        },
    )
}

fn reasons(record: &PortfolioRecord) -> Vec<&str> {
    record.metrics.score_details.breakdown.iter().map(|e| e.reason.as_str()).collect()
}

#[tokio::test]
async fn test_waterfall_walks_balances_then_metadata_of_held_tokens() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_balance(5)
        .mock_call_uint(USDC, BALANCE_OF, 1_000_000)
        .mock_call_uint(DAI, BALANCE_OF, 0)
        .mock_call_string(USDC, SYMBOL, "USDC")
        .mock_call_uint(USDC, DECIMALS, 6);

    let network = network(&[rpc_endpoint(ProviderId::Infura, &node.url())]);
    let records = engine(&[USDC, DAI]).run(&network, &[ProviderId::Infura]).await;
    let record = &records[0];

    assert_eq!(record.strategy.as_deref(), Some("waterfall_rpc"));
    assert!(record.error.is_none());
    assert_eq!(record.metrics.requests_sent, 5);
    assert_eq!(record.metrics.data_richness_score, 30);
    assert_eq!(record.metrics.estimated_cost_units, 400);
    assert_eq!(
        reasons(record),
        vec![
            "Base Score",
            "Request Amplification (5 requests)",
            "Low Data Richness",
            "High Integration Complexity"
        ]
    );
    assert_eq!(record.metrics.score_details.score, 30);
    assert_eq!(record.grade(), Grade::C);
}

#[tokio::test]
async fn test_enhanced_api_loads_metadata_per_held_token() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_method(
        "alchemy_getTokenBalances",
        &json!({
            "address": WALLET,
            "tokenBalances": [
                { "contractAddress": USDC, "tokenBalance": abi_word(42) },
                { "contractAddress": DAI, "tokenBalance": abi_word(0) }
            ]
        }),
    )
    .mock_method(
        "alchemy_getTokenMetadata",
        &json!({
            "name": "USD Coin",
            "symbol": "USDC",
            "decimals": 6,
            "logo": "https://x/usdc.png"
        }),
    );

    let network = network(&[rpc_endpoint(ProviderId::Alchemy, &node.url())]);
    let records = engine(&[USDC, DAI]).run(&network, &[ProviderId::Alchemy]).await;
    let record = &records[0];

    assert_eq!(record.strategy.as_deref(), Some("enhanced_rpc"));
    assert_eq!(record.metrics.requests_sent, 2);
    assert_eq!(record.metrics.data_richness_score, 60);
    assert_eq!(record.metrics.estimated_cost_units, 52);
    assert_eq!(record.metrics.score_details.score, 90);
    assert_eq!(record.grade(), Grade::S);
}

#[tokio::test]
async fn test_enhanced_failure_falls_back_to_waterfall_and_counts_all_requests() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_rpc_error("alchemy_getTokenBalances", -32601, "method not found")
        .mock_balance(1)
        .mock_call_uint(USDC, BALANCE_OF, 0);

    let network = network(&[rpc_endpoint(ProviderId::Alchemy, &node.url())]);
    let records = engine(&[USDC]).run(&network, &[ProviderId::Alchemy]).await;
    let record = &records[0];

    assert_eq!(record.strategy.as_deref(), Some("waterfall_rpc"));
    assert!(record.error.is_none());
    assert_eq!(record.metrics.requests_sent, 3);
    assert_eq!(record.metrics.estimated_cost_units, 78);
    assert_eq!(record.metrics.score_details.score, 40);
}

#[tokio::test]
async fn test_unified_rest_loads_portfolio_in_one_call() {
    let mut aggregator = RpcMockBuilder::new().await;
    aggregator.mock_rest(
        "/v1/1/address/",
        &json!({
            "data": { "items": [
                {
                    "quote_rate": 1.0,
                    "logo_url": "https://x/usdc.png",
                    "contract_name": "USD Coin"
                },
                { "contract_name": "Dust Token" }
            ]}
        }),
    );

    let network = network(&[rest_endpoint(ProviderId::Covalent, &aggregator.url())]);
    let records = engine(&[USDC]).run(&network, &[ProviderId::Covalent]).await;
    let record = &records[0];

    assert_eq!(record.strategy.as_deref(), Some("unified_rest"));
    assert_eq!(record.metrics.requests_sent, 1);
    assert_eq!(record.metrics.data_richness_score, 65);
    assert_eq!(record.metrics.score_details.score, 100);
    assert_eq!(reasons(record), vec!["Base Score"]);
    assert_eq!(record.grade(), Grade::S);
}

#[tokio::test]
async fn test_unified_graphql_query_is_graded_on_richness() {
    let mut indexer = RpcMockBuilder::new().await;
    indexer.mock_graphql(&json!({
        "balances": [{ "symbol": "USDC", "amount": "1" }, { "name": "Dai", "amount": "2" }]
    }));

    let mut row = EndpointConfig::rpc(Chain::Ethereum, ProviderId::TheGraph, indexer.url())
        .with_transport(Transport::GraphQl);
    row.portfolio_query = Some("query($wallet: String!) { balances(owner: $wallet) }".to_string());

    let network = network(&[row]);
    let records = engine(&[USDC]).run(&network, &[ProviderId::TheGraph]).await;
    let record = &records[0];

    assert_eq!(record.strategy.as_deref(), Some("unified_graphql"));
    assert_eq!(record.metrics.data_richness_score, 30);
    assert_eq!(record.metrics.score_details.score, 70);
    assert_eq!(record.grade(), Grade::A);
}

#[tokio::test]
async fn test_failing_provider_is_isolated_and_graded_f() {
    let mut broken = RpcMockBuilder::new().await;
    broken.mock_server_error();
    let mut healthy = RpcMockBuilder::new().await;
    healthy.mock_balance(1).mock_call_uint(USDC, BALANCE_OF, 0);

    let network = network(&[
        rpc_endpoint(ProviderId::Infura, &broken.url()),
        rpc_endpoint(ProviderId::Ankr, &healthy.url()),
    ]);
    let providers = [ProviderId::Infura, ProviderId::Ankr, ProviderId::Chainstack];
    let records = engine(&[USDC]).run(&network, &providers).await;

    let order: Vec<ProviderId> = records.iter().map(|r| r.provider).collect();
    assert_eq!(order, providers);

    let failed = &records[0];
    assert_eq!(failed.grade(), Grade::F);
    assert_eq!(failed.metrics.score_details.score, 0);
    assert_eq!(failed.metrics.requests_sent, 1);
    assert!(failed.error.as_deref().is_some_and(|e| e.contains("500")));
    assert_eq!(reasons(failed), vec!["Execution Error"]);

    assert!(records[1].error.is_none());
    assert_eq!(records[1].strategy.as_deref(), Some("waterfall_rpc"));

    let unsupported = &records[2];
    assert_eq!(unsupported.grade(), Grade::F);
    assert_eq!(unsupported.metrics.requests_sent, 0);
}
