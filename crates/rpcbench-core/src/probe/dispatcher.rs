use futures_util::future::join_all;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use super::{PrecisionMode, ProbeOutcome, ProbeTarget, RequestType};
use crate::{
    adapters::{AdapterResponse, LogicalRequest, ProtocolAdapter},
    network::{Chain, Endpoint, EndpointLookup, NetworkConfig, ProviderId, Transport},
    types::JsonRpcRequest,
    utils::quantity::{
        height_from_value, parse_quantity_u128, quantity_from_value, wei_to_gwei, BlockRef,
    },
};

/// Number of `eth_blockNumber` calls in the batch probe.
pub const BATCH_PROBE_SIZE: usize = 10;

/// Address whose historical balance is queried by the archive probe.
const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Block queried by the archive probe. Only archive nodes keep state this old.
const ARCHIVE_PROBE_BLOCK: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub precision: PrecisionMode,
    pub request_type: RequestType,
    pub inter_round_pause: Duration,
    /// Bound on one provider's timed rounds. The auxiliary checks get a separate budget of
    /// the same length.
    pub round_deadline: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            precision: PrecisionMode::Standard,
            request_type: RequestType::Light,
            inter_round_pause: Duration::from_millis(100),
            round_deadline: Duration::from_secs(60),
        }
    }
}

/// Runs timed probe rounds: sequential within a provider, concurrent across providers.
pub struct ProbeDispatcher {
    adapter: ProtocolAdapter,
    settings: ProbeSettings,
}

impl ProbeDispatcher {
    #[must_use]
    pub fn new(adapter: ProtocolAdapter, settings: ProbeSettings) -> Self {
        Self { adapter, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Probes every provider on `chain` and returns once all branches have finished.
    ///
    /// Outcomes keep the order of `providers`.
    pub async fn dispatch(
        &self,
        network: &NetworkConfig,
        chain: Chain,
        providers: &[ProviderId],
    ) -> Vec<ProbeOutcome> {
        let started = Instant::now();

        let branches =
            providers.iter().map(|&provider| self.probe(provider, network.lookup(chain, provider)));
        let outcomes = join_all(branches).await;

        tracing::info!(
            chain = %chain,
            providers = outcomes.len(),
            precision = %self.settings.precision,
            request_type = %self.settings.request_type,
            elapsed_ms = started.elapsed().as_millis(),
            "probe dispatch completed"
        );

        outcomes
    }

    /// Probes one provider. The timed rounds and the auxiliary checks are each bounded by
    /// the round deadline.
    pub async fn probe(&self, provider: ProviderId, lookup: EndpointLookup<'_>) -> ProbeOutcome {
        let EndpointLookup::Configured(endpoint) = lookup else {
            tracing::debug!(provider = %provider, "no endpoint on chain, skipping probe");
            return ProbeOutcome::unsupported(provider);
        };

        let target =
            ProbeTarget::Endpoint { transport: endpoint.transport(), secure: endpoint.is_secure() };
        let mut outcome = self.timed_rounds(endpoint, target).await;

        if endpoint.transport() == Transport::Rpc {
            self.auxiliary_checks(endpoint, &mut outcome).await;
        }
        outcome
    }

    /// Samples gathered before the deadline are kept. Rounds that never ran record `0`.
    async fn timed_rounds(&self, endpoint: &Endpoint, target: ProbeTarget) -> ProbeOutcome {
        let provider = endpoint.provider();
        let request = match self.settings.request_type {
            RequestType::Light => LogicalRequest::BlockNumber,
            RequestType::Heavy => LogicalRequest::LatestBlock { full_transactions: true },
        };
        let rounds = self.settings.precision.rounds();
        let deadline = tokio::time::Instant::now() + self.settings.round_deadline;

        let mut outcome = ProbeOutcome::failed(provider, target, 0);
        outcome.samples.reserve(rounds);

        for round in 0..rounds {
            if round > 0 {
                tokio::time::sleep(self.settings.inter_round_pause).await;
            }

            let started = Instant::now();
            let Ok(response) =
                tokio::time::timeout_at(deadline, self.adapter.execute(endpoint, &request)).await
            else {
                tracing::warn!(
                    provider = %provider,
                    round,
                    deadline_ms = self.settings.round_deadline.as_millis(),
                    "provider exceeded round deadline"
                );
                outcome.samples.resize(rounds, 0);
                break;
            };
            let elapsed = started.elapsed();

            if response.received() {
                outcome.headers.clone_from(&response.headers);
            }

            if response.ok {
                let latency = elapsed_ms(elapsed);
                tracing::debug!(provider = %provider, round, latency_ms = latency, "probe ok");
                outcome.samples.push(latency);
                if let Some(height) = self.extract_height(endpoint, &response) {
                    outcome.block_height = Some(height);
                }
            } else {
                tracing::warn!(
                    provider = %provider,
                    round = round,
                    status = response.status,
                    error = response.detail.or(response.error).unwrap_or("rejected"),
                    "probe failed"
                );
                outcome.samples.push(0);
            }
        }

        outcome
    }

    /// Archive, gas and batch checks. A check cut off by the deadline stays unknown.
    async fn auxiliary_checks(&self, endpoint: &Endpoint, outcome: &mut ProbeOutcome) {
        let deadline = tokio::time::Instant::now() + self.settings.round_deadline;

        outcome.archive =
            tokio::time::timeout_at(deadline, self.archive_probe(endpoint)).await.ok().flatten();
        outcome.gas_gwei =
            tokio::time::timeout_at(deadline, self.gas_probe(endpoint)).await.ok().flatten();
        if self.settings.request_type == RequestType::Light {
            outcome.batch_latency =
                tokio::time::timeout_at(deadline, self.batch_probe(endpoint)).await.ok();
        }

        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(
                provider = %endpoint.provider(),
                deadline_ms = self.settings.round_deadline.as_millis(),
                "auxiliary checks exceeded round deadline"
            );
        }
    }

    fn extract_height(&self, endpoint: &Endpoint, response: &AdapterResponse) -> Option<u64> {
        match endpoint.transport() {
            Transport::Rpc => {
                let result = response.rpc_result()?;
                match self.settings.request_type {
                    RequestType::Light => quantity_from_value(result),
                    RequestType::Heavy => result.get("number").and_then(quantity_from_value),
                }
            }
            Transport::Rest | Transport::GraphQl => endpoint
                .height_pointer()
                .and_then(|pointer| response.body.pointer(pointer))
                .and_then(height_from_value),
        }
    }

    /// `Some(true)` if historical state is served, `Some(false)` if the node answered but
    /// refused, `None` if it was unreachable.
    async fn archive_probe(&self, endpoint: &Endpoint) -> Option<bool> {
        let request = LogicalRequest::Balance {
            address: ZERO_ADDRESS.to_string(),
            block: BlockRef::Number(ARCHIVE_PROBE_BLOCK),
        };
        let response = self.adapter.execute(endpoint, &request).await;
        if response.ok {
            Some(true)
        } else if response.received() {
            Some(false)
        } else {
            tracing::debug!(provider = %endpoint.provider(), "archive probe unreachable");
            None
        }
    }

    async fn gas_probe(&self, endpoint: &Endpoint) -> Option<f64> {
        let response = self.adapter.execute(endpoint, &LogicalRequest::GasPrice).await;
        let gwei = response
            .rpc_result()
            .and_then(Value::as_str)
            .and_then(parse_quantity_u128)
            .map(wei_to_gwei);
        if gwei.is_none() {
            tracing::debug!(provider = %endpoint.provider(), "gas price unavailable");
        }
        gwei
    }

    /// Elapsed ms for one batched payload, `0` on failure.
    async fn batch_probe(&self, endpoint: &Endpoint) -> u64 {
        let batch = JsonRpcRequest::batch("eth_blockNumber", &json!([]), BATCH_PROBE_SIZE);

        let started = Instant::now();
        let response = self.adapter.rpc_batch(endpoint, &batch).await;
        let elapsed = started.elapsed();

        if response.ok {
            elapsed_ms(elapsed)
        } else {
            tracing::debug!(
                provider = %endpoint.provider(),
                status = response.status,
                "batch probe failed"
            );
            0
        }
    }
}

/// Wall-clock ms for a success, never `0` so it cannot read as a failure.
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX).max(1)
}
