//! Cross-provider validation of a single contract read.
//!
//! A target from the `[[consensus.targets]]` registry is encoded once, sent as `eth_call` to
//! every RPC provider, decoded, and reduced to the most common value. Providers that return
//! nothing, fail, or lack an RPC endpoint are excluded from the vote.

pub mod config;
pub mod engine;
pub mod quorum;
pub mod types;

pub use config::{AssetClass, ConsensusConfig, ConsensusTarget};
pub use engine::ConsensusValidator;
pub use quorum::{find_consensus, flag_mismatches, tally, VoteGroup};
pub use types::{ConsensusQuery, ConsensusReport, ConsensusVote};
