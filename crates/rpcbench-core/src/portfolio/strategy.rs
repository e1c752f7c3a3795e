use tracing::warn;

use super::{
    scenarios::{
        EnhancedRpc, PortfolioScenario, ScenarioContext, ScenarioFailure, UnifiedGraphQl,
        UnifiedRest, WaterfallRpc,
    },
    types::ScenarioMetrics,
};
use crate::{
    adapters::BenchError,
    network::{Endpoint, Transport},
};

/// The first strategy that completed, with requests spent by failed candidates included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub strategy: &'static str,
    pub metrics: ScenarioMetrics,
}

/// Candidate strategies for one provider, tried in order until one completes.
pub struct FallbackChain {
    candidates: Vec<Box<dyn PortfolioScenario>>,
}

impl FallbackChain {
    #[must_use]
    pub fn new(candidates: Vec<Box<dyn PortfolioScenario>>) -> Self {
        Self { candidates }
    }

    /// Built-in candidates for the endpoint's transport. Providers with an enhanced token API
    /// fall back to the raw waterfall.
    #[must_use]
    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        let candidates: Vec<Box<dyn PortfolioScenario>> = match endpoint.transport() {
            Transport::Rest => vec![Box::new(UnifiedRest)],
            Transport::GraphQl => vec![Box::new(UnifiedGraphQl)],
            Transport::Rpc if endpoint.provider().has_enhanced_token_api() => {
                vec![Box::new(EnhancedRpc), Box::new(WaterfallRpc)]
            }
            Transport::Rpc => vec![Box::new(WaterfallRpc)],
        };
        Self::new(candidates)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.candidates.iter().map(|c| c.name()).collect()
    }

    /// Runs candidates in order. The first success short-circuits.
    ///
    /// # Errors
    ///
    /// Returns the last failure, carrying the requests of every attempt, when no candidate
    /// completes.
    pub async fn run(&self, ctx: &ScenarioContext<'_>) -> Result<StrategyOutcome, ScenarioFailure> {
        let mut spent = 0u32;
        let mut last_failure = None;

        for candidate in &self.candidates {
            match candidate.run(ctx).await {
                Ok(mut metrics) => {
                    metrics.requests_sent = metrics.requests_sent.saturating_add(spent);
                    return Ok(StrategyOutcome { strategy: candidate.name(), metrics });
                }
                Err(failure) => {
                    warn!(
                        provider = %ctx.endpoint.provider(),
                        strategy = candidate.name(),
                        requests = failure.requests_sent,
                        error = %failure.error,
                        "portfolio strategy failed"
                    );
                    spent = spent.saturating_add(failure.requests_sent);
                    last_failure = Some(failure);
                }
            }
        }

        Err(match last_failure {
            Some(mut failure) => {
                failure.requests_sent = spent;
                failure
            }
            None => ScenarioFailure {
                requests_sent: 0,
                error: BenchError::InvalidEndpoint(
                    "no portfolio strategy for endpoint".to_string(),
                ),
            },
        })
    }
}
