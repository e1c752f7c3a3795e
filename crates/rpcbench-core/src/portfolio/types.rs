use serde::{Deserialize, Serialize};
use std::fmt;

use crate::network::ProviderId;

/// Effort a builder spends integrating a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// Builder impact rating reported alongside the metrics.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 3,
            Self::High => 5,
        }
    }
}

/// Letter grade of a scenario. `F` is reserved for scenarios that did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::S => "S",
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::F => "F",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownCategory {
    Base,
    Latency,
    Efficiency,
    Quality,
    Complexity,
    Error,
}

/// One line of the score ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub reason: String,
    pub delta: i32,
    pub category: BreakdownCategory,
}

impl BreakdownEntry {
    #[must_use]
    pub fn new(reason: impl Into<String>, delta: i32, category: BreakdownCategory) -> Self {
        Self { reason: reason.into(), delta, category }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub score: u32,
    pub grade: Grade,
    pub breakdown: Vec<BreakdownEntry>,
}

/// What a completed scenario measured, before timing and grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioMetrics {
    pub requests_sent: u32,
    /// 0 to 100.
    pub data_richness_score: u8,
    pub integration_complexity: Complexity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub time_to_interactive_ms: u64,
    pub requests_sent: u32,
    pub data_richness_score: u8,
    pub estimated_cost_units: u64,
    pub builder_impact_rating: u8,
    pub score_details: ScoreDetails,
}

/// One provider's portfolio result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRecord {
    pub provider: ProviderId,
    pub name: String,
    /// Strategy that produced the metrics. `None` when every candidate failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metrics: PortfolioMetrics,
}

impl PortfolioRecord {
    #[must_use]
    pub fn grade(&self) -> Grade {
        self.metrics.score_details.grade
    }
}
