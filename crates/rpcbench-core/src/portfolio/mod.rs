//! Scenario-based integration-efficiency benchmark.
//!
//! For one wallet and chain, every provider loads the wallet's holdings with the best strategy
//! its transport offers. The engine times the attempt, counts requests and billing units,
//! measures how much metadata came back, and grades the result on a penalty ladder.

pub mod config;
pub mod engine;
pub mod grading;
pub mod scenarios;
pub mod strategy;
pub mod types;

pub use config::PortfolioConfig;
pub use engine::PortfolioEngine;
pub use grading::{execution_error, grade, score_scenario};
pub use scenarios::{PortfolioScenario, ScenarioContext, ScenarioFailure};
pub use strategy::{FallbackChain, StrategyOutcome};
pub use types::{
    BreakdownCategory, BreakdownEntry, Complexity, Grade, PortfolioMetrics, PortfolioRecord,
    ScenarioMetrics, ScoreDetails,
};
