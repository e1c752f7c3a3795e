use futures_util::future::join_all;
use std::time::Instant;
use tracing::{info, warn};

use super::{
    grading::{execution_error, score_scenario},
    scenarios::ScenarioContext,
    strategy::FallbackChain,
    types::{PortfolioMetrics, PortfolioRecord},
    PortfolioConfig,
};
use crate::{
    adapters::{BenchError, ProtocolAdapter},
    network::{EndpointLookup, NetworkConfig, ProviderId},
};

/// Grades how efficiently each provider loads one wallet's portfolio.
///
/// Every provider runs in its own branch; a failing branch produces an `F` record and never
/// affects its siblings.
pub struct PortfolioEngine {
    adapter: ProtocolAdapter,
    config: PortfolioConfig,
}

impl PortfolioEngine {
    #[must_use]
    pub fn new(adapter: ProtocolAdapter, config: PortfolioConfig) -> Self {
        Self { adapter, config }
    }

    #[must_use]
    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    /// Runs one scenario per provider concurrently. Records keep the order of `providers`.
    pub async fn run(
        &self,
        network: &NetworkConfig,
        providers: &[ProviderId],
    ) -> Vec<PortfolioRecord> {
        let chain = self.config.chain;
        let futures = providers
            .iter()
            .map(|&provider| self.run_provider(provider, network.lookup(chain, provider)));

        let records = join_all(futures).await;

        info!(
            chain = %chain,
            wallet = %self.config.wallet,
            providers = records.len(),
            failed = records.iter().filter(|r| r.error.is_some()).count(),
            "portfolio benchmark completed"
        );

        records
    }

    async fn run_provider(
        &self,
        provider: ProviderId,
        lookup: EndpointLookup<'_>,
    ) -> PortfolioRecord {
        let Some(endpoint) = lookup.endpoint() else {
            let error = BenchError::Unsupported { provider, chain: self.config.chain };
            warn!(provider = %provider, error = %error, "portfolio scenario skipped");
            return failed_record(provider, 0, 0, &error.to_string());
        };

        let ctx = ScenarioContext {
            adapter: &self.adapter,
            endpoint,
            wallet: &self.config.wallet,
            tracked_tokens: &self.config.tracked_tokens,
        };

        let strategies = FallbackChain::for_endpoint(endpoint);
        let started = Instant::now();
        let result = strategies.run(&ctx).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let profile = provider.profile();
        match result {
            Ok(outcome) => {
                let metrics = outcome.metrics;
                let score_details =
                    score_scenario(elapsed_ms, &metrics, self.config.latency_budget_ms);
                PortfolioRecord {
                    provider,
                    name: profile.display_name.to_string(),
                    strategy: Some(outcome.strategy.to_string()),
                    error: None,
                    metrics: PortfolioMetrics {
                        time_to_interactive_ms: elapsed_ms,
                        requests_sent: metrics.requests_sent,
                        data_richness_score: metrics.data_richness_score,
                        estimated_cost_units: cost_units(provider, metrics.requests_sent),
                        builder_impact_rating: metrics.integration_complexity.weight(),
                        score_details,
                    },
                }
            }
            Err(failure) => {
                failed_record(provider, elapsed_ms, failure.requests_sent, &failure.to_string())
            }
        }
    }
}

fn cost_units(provider: ProviderId, requests: u32) -> u64 {
    u64::from(requests) * u64::from(provider.profile().cost_units_per_call)
}

fn failed_record(
    provider: ProviderId,
    elapsed_ms: u64,
    requests: u32,
    error: &str,
) -> PortfolioRecord {
    PortfolioRecord {
        provider,
        name: provider.profile().display_name.to_string(),
        strategy: None,
        error: Some(error.to_string()),
        metrics: PortfolioMetrics {
            time_to_interactive_ms: elapsed_ms,
            requests_sent: requests,
            data_richness_score: 0,
            estimated_cost_units: cost_units(provider, requests),
            builder_impact_rating: 0,
            score_details: execution_error(),
        },
    }
}
