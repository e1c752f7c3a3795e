//! Strategies for loading a wallet's holdings.
//!
//! Each strategy reports how many requests it needed, how rich the returned data was and how
//! much integration work it implies. Timing and grading happen in the engine.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use super::types::{Complexity, ScenarioMetrics};
use crate::{
    adapters::{BenchError, LogicalRequest, ProtocolAdapter},
    network::Endpoint,
    utils::{
        abi::{decode_string, encode_call, AbiMethod, AbiParam},
        quantity::BlockRef,
    },
};

const PRICE_POINTS: u32 = 40;
const LOGO_POINTS: u32 = 30;
const METADATA_POINTS: u32 = 30;

const PRICE_KEYS: [&str; 4] = ["quote_rate", "quote", "price", "priceUsd"];
const LOGO_KEYS: [&str; 4] = ["logo_url", "logo", "logoURI", "image"];
const METADATA_KEYS: [&str; 4] = ["contract_name", "contract_ticker_symbol", "name", "symbol"];
const ASSET_POINTERS: [&str; 4] =
    ["/data/items", "/data/tokenBalances", "/data/balances", "/data/tokens"];

/// Inputs shared by every strategy of one provider.
pub struct ScenarioContext<'a> {
    pub adapter: &'a ProtocolAdapter,
    pub endpoint: &'a Endpoint,
    pub wallet: &'a str,
    pub tracked_tokens: &'a [String],
}

/// A strategy that did not complete, with the requests it spent before failing.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ScenarioFailure {
    pub requests_sent: u32,
    pub error: BenchError,
}

impl ScenarioFailure {
    fn new(requests_sent: u32, error: BenchError) -> Self {
        Self { requests_sent, error }
    }
}

#[async_trait]
pub trait PortfolioScenario: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &ScenarioContext<'_>) -> Result<ScenarioMetrics, ScenarioFailure>;
}

/// One REST call that returns balances with prices and metadata.
pub struct UnifiedRest;

#[async_trait]
impl PortfolioScenario for UnifiedRest {
    fn name(&self) -> &'static str {
        "unified_rest"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> Result<ScenarioMetrics, ScenarioFailure> {
        let template = ctx.endpoint.config().portfolio_url.as_deref().ok_or_else(|| {
            ScenarioFailure::new(0, BenchError::InvalidEndpoint("no portfolio_url".to_string()))
        })?;
        let route = template
            .replace("{wallet}", ctx.wallet)
            .replace("{chain_id}", &ctx.endpoint.chain().chain_id().to_string());

        let response = ctx.adapter.rest_get(ctx.endpoint, Some(&route), &[]).await;
        if !response.ok {
            return Err(ScenarioFailure::new(1, response.to_error()));
        }

        Ok(ScenarioMetrics {
            requests_sent: 1,
            data_richness_score: richness(&collect_assets(&response.body)),
            integration_complexity: Complexity::Low,
        })
    }
}

/// One GraphQL query over an indexed schema.
pub struct UnifiedGraphQl;

#[async_trait]
impl PortfolioScenario for UnifiedGraphQl {
    fn name(&self) -> &'static str {
        "unified_graphql"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> Result<ScenarioMetrics, ScenarioFailure> {
        let query = ctx.endpoint.config().portfolio_query.as_deref().ok_or_else(|| {
            ScenarioFailure::new(0, BenchError::InvalidEndpoint("no portfolio_query".to_string()))
        })?;

        let response = ctx
            .adapter
            .graphql(ctx.endpoint, query, json!({ "wallet": ctx.wallet.to_lowercase() }))
            .await;
        if !response.ok {
            return Err(ScenarioFailure::new(1, response.to_error()));
        }

        Ok(ScenarioMetrics {
            requests_sent: 1,
            data_richness_score: richness(&collect_assets(&response.body)),
            integration_complexity: Complexity::Medium,
        })
    }
}

/// Native balance, then `balanceOf` per tracked token, then `symbol` and `decimals` for every
/// token held.
pub struct WaterfallRpc;

#[async_trait]
impl PortfolioScenario for WaterfallRpc {
    fn name(&self) -> &'static str {
        "waterfall_rpc"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> Result<ScenarioMetrics, ScenarioFailure> {
        let mut requests = 0u32;

        let native =
            LogicalRequest::Balance { address: ctx.wallet.to_string(), block: BlockRef::Latest };
        let response = ctx.adapter.execute(ctx.endpoint, &native).await;
        requests += 1;
        if !response.ok {
            return Err(ScenarioFailure::new(requests, response.to_error()));
        }
        debug!(
            provider = %ctx.endpoint.provider(),
            symbol = ctx.endpoint.chain().native_symbol(),
            "native balance loaded"
        );

        let holder = [AbiParam::Address(ctx.wallet.to_string())];
        let balance_data = encode_call(AbiMethod::BalanceOf, &holder)
            .map_err(|e| ScenarioFailure::new(requests, e))?;
        let symbol_data =
            encode_call(AbiMethod::Symbol, &[]).map_err(|e| ScenarioFailure::new(requests, e))?;
        let decimals_data =
            encode_call(AbiMethod::Decimals, &[]).map_err(|e| ScenarioFailure::new(requests, e))?;

        let mut held = Vec::new();
        for token in ctx.tracked_tokens {
            let call = LogicalRequest::Call { to: token.clone(), data: balance_data.clone() };
            let response = ctx.adapter.execute(ctx.endpoint, &call).await;
            requests += 1;
            if let Some(raw) = response.rpc_result().and_then(Value::as_str) {
                if is_nonzero_quantity(raw) {
                    held.push(token);
                }
            }
        }

        // The native asset always carries a known symbol.
        let mut asset_scores = vec![METADATA_POINTS];
        for token in held {
            let call = LogicalRequest::Call { to: token.clone(), data: symbol_data.clone() };
            let symbol = ctx.adapter.execute(ctx.endpoint, &call).await;
            let call = LogicalRequest::Call { to: token.clone(), data: decimals_data.clone() };
            let decimals = ctx.adapter.execute(ctx.endpoint, &call).await;
            requests += 2;

            let named = symbol
                .rpc_result()
                .and_then(Value::as_str)
                .and_then(decode_string)
                .is_some_and(|s| !s.is_empty());
            debug!(token = %token, named = named, decimals_ok = decimals.ok, "token metadata");
            asset_scores.push(if named { METADATA_POINTS } else { 0 });
        }

        Ok(ScenarioMetrics {
            requests_sent: requests,
            data_richness_score: average(&asset_scores),
            integration_complexity: Complexity::High,
        })
    }
}

/// `alchemy_getTokenBalances` followed by `alchemy_getTokenMetadata` per held token.
pub struct EnhancedRpc;

#[async_trait]
impl PortfolioScenario for EnhancedRpc {
    fn name(&self) -> &'static str {
        "enhanced_rpc"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> Result<ScenarioMetrics, ScenarioFailure> {
        let response = ctx
            .adapter
            .rpc(ctx.endpoint, "alchemy_getTokenBalances", json!([ctx.wallet, ctx.tracked_tokens]))
            .await;
        let mut requests = 1u32;
        if !response.ok {
            return Err(ScenarioFailure::new(requests, response.to_error()));
        }

        let held: Vec<String> = response
            .rpc_result()
            .and_then(|r| r.get("tokenBalances"))
            .and_then(Value::as_array)
            .map(|balances| {
                balances
                    .iter()
                    .filter(|b| {
                        b.get("tokenBalance")
                            .and_then(Value::as_str)
                            .is_some_and(is_nonzero_quantity)
                    })
                    .filter_map(|b| b.get("contractAddress").and_then(Value::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let mut asset_scores = Vec::with_capacity(held.len());
        for contract in &held {
            let metadata =
                ctx.adapter.rpc(ctx.endpoint, "alchemy_getTokenMetadata", json!([contract])).await;
            requests += 1;
            asset_scores.push(metadata.rpc_result().map_or(0, asset_richness));
        }

        Ok(ScenarioMetrics {
            requests_sent: requests,
            data_richness_score: average(&asset_scores),
            integration_complexity: Complexity::Medium,
        })
    }
}

/// Asset entries of a unified response: a known list location, else the first array under
/// `data`.
fn collect_assets(body: &Value) -> Vec<&Value> {
    let list = ASSET_POINTERS
        .iter()
        .find_map(|p| body.pointer(p))
        .and_then(Value::as_array)
        .or_else(|| {
            body.get("data").and_then(Value::as_object)?.values().find_map(Value::as_array)
        });
    list.map(|items| items.iter().collect()).unwrap_or_default()
}

/// Points for one asset: price 40, logo 30, name or symbol 30.
fn asset_richness(asset: &Value) -> u32 {
    let present = |keys: &[&str]| {
        keys.iter().any(|k| asset.get(*k).is_some_and(|v| !v.is_null() && v != &json!("")))
    };

    let mut points = 0;
    if present(&PRICE_KEYS) {
        points += PRICE_POINTS;
    }
    if present(&LOGO_KEYS) {
        points += LOGO_POINTS;
    }
    if present(&METADATA_KEYS) {
        points += METADATA_POINTS;
    }
    points
}

fn richness(assets: &[&Value]) -> u8 {
    let scores: Vec<u32> = assets.iter().map(|a| asset_richness(a)).collect();
    average(&scores)
}

fn average(scores: &[u32]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let sum: u32 = scores.iter().sum();
    let len = u32::try_from(scores.len()).unwrap_or(u32::MAX);
    u8::try_from((sum / len).min(100)).unwrap_or(100)
}

/// True for a hex quantity with at least one nonzero digit.
fn is_nonzero_quantity(raw: &str) -> bool {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    digits.chars().all(|c| c.is_ascii_hexdigit()) && digits.chars().any(|c| c != '0')
}
