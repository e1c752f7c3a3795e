//! Integration tests for the security audit over real HTTP responses.
//!
//! Mock servers are plain HTTP, so every JSON-RPC endpoint here also carries the
//! insecure-transport finding.

use crate::mock_infrastructure::{
    network, rest_endpoint, rpc_endpoint, test_adapter, RpcMockBuilder,
};
use rpcbench_core::{
    probe::{security::CONFIG_MISSING, ProbeDispatcher, ProbeSettings, SecurityAuditor},
    Chain, ProviderId,
};
use serde_json::json;
use std::time::Duration;

fn dispatcher() -> ProbeDispatcher {
    ProbeDispatcher::new(
        test_adapter(),
        ProbeSettings { inter_round_pause: Duration::from_millis(1), ..ProbeSettings::default() },
    )
}

#[tokio::test]
async fn test_leaky_headers_and_plain_http_are_flagged() {
    let mut mock = RpcMockBuilder::new().await;
    mock.with_response_header("x-powered-by", "Express").with_response_header("server", "nginx");
    mock.mock_healthy_node(1, 10);

    let network = network(&[rpc_endpoint(ProviderId::Ankr, &mock.url())]);
    let outcomes = dispatcher().dispatch(&network, Chain::Ethereum, &[ProviderId::Ankr]).await;

    assert_eq!(outcomes[0].headers.get("x-powered-by").map(String::as_str), Some("Express"));

    let report = SecurityAuditor::audit(&outcomes[0].target, &outcomes[0].headers);
    assert_eq!(report.score, 30);
    assert!(report.issues.iter().any(|i| i.starts_with("Insecure transport")));
    assert!(report.issues.contains(&"Header leak: x-powered-by".to_string()));
    assert!(report.issues.contains(&"Header leak: server".to_string()));
}

#[tokio::test]
async fn test_aggregators_are_not_audited_for_headers() {
    let mut mock = RpcMockBuilder::new().await;
    mock.with_response_header("x-powered-by", "Express");
    mock.mock_rest("/v1/", &json!({ "data": { "items": [{ "height": 5 }] } }));

    let network = network(&[rest_endpoint(ProviderId::Covalent, &mock.url())]);
    let outcomes = dispatcher().dispatch(&network, Chain::Ethereum, &[ProviderId::Covalent]).await;

    let report = SecurityAuditor::audit(&outcomes[0].target, &outcomes[0].headers);
    assert_eq!(report.score, 100);
    assert!(report.issues.is_empty());
}

#[tokio::test]
async fn test_unconfigured_provider_reports_config_missing() {
    let network = network(&[rpc_endpoint(ProviderId::Ankr, "https://rpc.example/")]);
    let outcomes = dispatcher().dispatch(&network, Chain::Polygon, &[ProviderId::Ankr]).await;

    let report = SecurityAuditor::audit(&outcomes[0].target, &outcomes[0].headers);
    assert_eq!(report.score, 0);
    assert_eq!(report.issues, vec![CONFIG_MISSING.to_string()]);
}
