//! Integration Tests for rpcbench
//!
//! This crate contains various test modules:
//!
//! - `dispatcher_tests`: Probe rounds against mock nodes, deadlines and auxiliary probes
//! - `benchmark_tests`: Full rounds from dispatch to the published leaderboard snapshot
//! - `security_tests`: Header-leak and transport findings observed over real HTTP
//! - `consensus_tests`: Majority voting and mismatch detection across mock providers
//! - `portfolio_tests`: Portfolio strategies, fallback and grading against mock providers
//! - `mock_infrastructure`: Reusable mock types for testing
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```
//!
//! Every test runs against local mockito servers; nothing reaches a real provider.

#[cfg(test)]
mod dispatcher_tests;

#[cfg(test)]
mod benchmark_tests;

#[cfg(test)]
mod security_tests;


#[cfg(test)]
mod portfolio_tests;

/// Mock infrastructure for testing
pub mod mock_infrastructure;
