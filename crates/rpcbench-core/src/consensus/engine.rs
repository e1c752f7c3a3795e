use futures_util::future::join_all;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{
    quorum::{find_consensus, flag_mismatches, tally},
    AssetClass, ConsensusConfig, ConsensusQuery, ConsensusReport, ConsensusVote,
};
use crate::{
    adapters::{BenchError, LogicalRequest, ProtocolAdapter},
    network::{Chain, EndpointLookup, NetworkConfig, ProviderId, Transport},
    utils::abi::{decode_result, Decoded},
};

/// Sends one contract read to every provider and reports which answers agree.
pub struct ConsensusValidator {
    adapter: ProtocolAdapter,
    config: ConsensusConfig,
}

impl ConsensusValidator {
    #[must_use]
    pub fn new(adapter: ProtocolAdapter, config: ConsensusConfig) -> Self {
        Self { adapter, config }
    }

    /// Encodes the registered target for `(chain, asset)`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::MissingTarget`] when no target is registered, or the encoding
    /// error of a malformed target.
    pub fn resolve(&self, chain: Chain, asset: AssetClass) -> Result<ConsensusQuery, BenchError> {
        let target = self
            .config
            .target(chain, asset)
            .ok_or_else(|| BenchError::MissingTarget { chain, asset: asset.to_string() })?;
        ConsensusQuery::new(target.clone())
    }

    /// Resolves and validates the registered target for `(chain, asset)`.
    ///
    /// # Errors
    ///
    /// Fails only when the target cannot be resolved. Provider failures become excluded votes.
    pub async fn validate_asset(
        &self,
        network: &NetworkConfig,
        chain: Chain,
        asset: AssetClass,
        providers: &[ProviderId],
    ) -> Result<ConsensusReport, BenchError> {
        let query = self.resolve(chain, asset)?;
        Ok(self.validate(network, &query, providers).await)
    }

    /// Issues `query` against every provider concurrently and tallies the decoded results.
    ///
    /// Votes keep the order of `providers`, which also decides ties.
    pub async fn validate(
        &self,
        network: &NetworkConfig,
        query: &ConsensusQuery,
        providers: &[ProviderId],
    ) -> ConsensusReport {
        let chain = query.target.chain;
        let futures = providers
            .iter()
            .map(|&provider| self.vote(provider, network.lookup(chain, provider), query));

        let mut votes = join_all(futures).await;

        let groups = tally(&votes);
        let consensus = find_consensus(&groups).map(|g| (g.value.clone(), g.count));
        flag_mismatches(&mut votes, consensus.as_ref().map(|(value, _)| value.as_str()));

        let participants = votes.iter().filter(|v| v.success).count();
        let (consensus, agreement) = match consensus {
            Some((value, count)) => (Some(value), count),
            None => (None, 0),
        };

        info!(
            chain = %chain,
            asset = %query.target.asset,
            method = %query.target.method,
            participants = participants,
            agreement = agreement,
            consensus = consensus.as_deref().unwrap_or("none"),
            "consensus validation completed"
        );

        for vote in votes.iter().filter(|v| v.is_mismatch) {
            warn!(
                provider = %vote.provider,
                chain = %chain,
                result = vote.result.as_deref().unwrap_or_default(),
                "provider disagrees with consensus"
            );
        }

        ConsensusReport {
            chain,
            asset: query.target.asset,
            contract: query.target.contract.clone(),
            method: query.target.method,
            consensus,
            agreement,
            participants,
            votes,
        }
    }

    async fn vote(
        &self,
        provider: ProviderId,
        lookup: EndpointLookup<'_>,
        query: &ConsensusQuery,
    ) -> ConsensusVote {
        let Some(endpoint) = lookup.endpoint() else {
            debug!(provider = %provider, "no endpoint for chain, vote excluded");
            return ConsensusVote::excluded(provider, 0);
        };
        if endpoint.transport() != Transport::Rpc {
            debug!(
                provider = %provider,
                transport = %endpoint.transport(),
                "not an rpc endpoint, vote excluded"
            );
            return ConsensusVote::excluded(provider, 0);
        }

        let request =
            LogicalRequest::Call { to: query.target.contract.clone(), data: query.data.clone() };

        let started = Instant::now();
        let response = self.adapter.execute(endpoint, &request).await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if !response.ok {
            warn!(provider = %provider, error = %response.to_error(), "eth_call failed");
            return ConsensusVote::excluded(provider, latency_ms);
        }

        let raw = response.rpc_result().and_then(|v| v.as_str()).unwrap_or_default();
        match decode_result(raw, query.target.method.return_kind()) {
            Decoded::Empty => {
                debug!(provider = %provider, "eth_call returned no data");
                ConsensusVote::excluded(provider, latency_ms)
            }
            Decoded::Value(value) => ConsensusVote::counted(provider, value, latency_ms),
        }
    }
}
