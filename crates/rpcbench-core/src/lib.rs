//! # rpcbench Core
//!
//! Benchmarking and scoring engine for blockchain data-access providers
//! (JSON-RPC nodes, REST and GraphQL aggregators).
//!
//! This crate provides:
//!
//! - **[`adapters`]**: Protocol adapters that turn a logical request into a JSON-RPC envelope,
//!   REST query or GraphQL document and normalize every transport outcome into an
//!   [`adapters::AdapterResponse`].
//!
//! - **[`probe`]**: The probe dispatcher (timed sequential rounds per provider, concurrent across
//!   providers), the statistics reducer and the security auditor.
//!
//! - **[`consensus`]**: Cross-provider validation of a single on-chain read.
//!
//! - **[`scoring`]**: Weighted composite scoring, cost estimation and winner selection.
//!
//! - **[`portfolio`]**: Scenario-based integration-efficiency grading with bulkhead isolation.
//!
//! - **[`benchmark`]** and **[`leaderboard`]**: Round orchestration and the immutable snapshot
//!   that readers observe.
//!
//! ## Round Flow
//!
//! ```text
//!  NetworkConfig ──► ProbeDispatcher ──(join all)──► reduce (p50/p99/uptime)
//!                                                        │
//!                                                        ▼
//!                                         global lag ─► SecurityAuditor
//!                                                        │
//!                                                        ▼
//!                                                  ScoringEngine
//!                                                        │
//!                                                        ▼
//!                                          Leaderboard::publish (swap)
//! ```
//!
//! The consensus validator and the portfolio engine are independent pipelines that share
//! the adapters and the network configuration.

pub mod adapters;
pub mod benchmark;
pub mod config;
pub mod consensus;
pub mod leaderboard;
pub mod network;
pub mod portfolio;
pub mod probe;
pub mod record;
pub mod scoring;
pub mod types;
pub mod utils;

pub use adapters::{AdapterResponse, BenchError, HttpClient, HttpClientConfig, ProtocolAdapter};
pub use benchmark::BenchmarkEngine;
pub use leaderboard::{Leaderboard, LeaderboardSnapshot};
pub use network::{Chain, NetworkConfig, ProviderId, Transport};
pub use record::{ProviderRecord, Winner};
