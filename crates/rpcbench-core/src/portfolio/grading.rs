//! Penalty ladder for portfolio scenarios.

use super::types::{
    BreakdownCategory, BreakdownEntry, Complexity, Grade, ScenarioMetrics, ScoreDetails,
};

const BASE_SCORE: i32 = 100;
const LATENCY_PENALTY: i32 = -20;
const PER_REQUEST_PENALTY: i32 = -5;
const LOW_RICHNESS_PENALTY: i32 = -30;
const LOW_RICHNESS_THRESHOLD: u8 = 50;
const RICH_DATA_THRESHOLD: u8 = 80;
const COMPLEXITY_PENALTY: i32 = -15;

/// Letter grade for a completed scenario.
#[must_use]
pub fn grade(score: u32) -> Grade {
    match score {
        90.. => Grade::S,
        80..=89 => Grade::APlus,
        70..=79 => Grade::A,
        50..=69 => Grade::B,
        _ => Grade::C,
    }
}

/// Builds the breakdown for a completed scenario and clamps the total at zero.
#[must_use]
pub fn score_scenario(
    elapsed_ms: u64,
    metrics: &ScenarioMetrics,
    latency_budget_ms: u64,
) -> ScoreDetails {
    let mut breakdown =
        vec![BreakdownEntry::new("Base Score", BASE_SCORE, BreakdownCategory::Base)];

    if elapsed_ms > latency_budget_ms {
        breakdown.push(BreakdownEntry::new(
            format!("High Latency (>{latency_budget_ms}ms)"),
            LATENCY_PENALTY,
            BreakdownCategory::Latency,
        ));
    }

    if metrics.requests_sent > 1 {
        let requests = i32::try_from(metrics.requests_sent).unwrap_or(i32::MAX);
        breakdown.push(BreakdownEntry::new(
            format!("Request Amplification ({requests} requests)"),
            requests.saturating_mul(PER_REQUEST_PENALTY),
            BreakdownCategory::Efficiency,
        ));
    }

    if metrics.data_richness_score < LOW_RICHNESS_THRESHOLD {
        breakdown.push(BreakdownEntry::new(
            "Low Data Richness",
            LOW_RICHNESS_PENALTY,
            BreakdownCategory::Quality,
        ));
    } else if metrics.data_richness_score > RICH_DATA_THRESHOLD {
        breakdown.push(BreakdownEntry::new("Rich Metadata", 0, BreakdownCategory::Quality));
    }

    if metrics.integration_complexity == Complexity::High {
        breakdown.push(BreakdownEntry::new(
            "High Integration Complexity",
            COMPLEXITY_PENALTY,
            BreakdownCategory::Complexity,
        ));
    }

    let total = breakdown.iter().fold(0i32, |acc, entry| acc.saturating_add(entry.delta));
    let score = u32::try_from(total.max(0)).unwrap_or(0);

    ScoreDetails { score, grade: grade(score), breakdown }
}

/// Details of a scenario that did not complete.
#[must_use]
pub fn execution_error() -> ScoreDetails {
    ScoreDetails {
        score: 0,
        grade: Grade::F,
        breakdown: vec![BreakdownEntry::new("Execution Error", -100, BreakdownCategory::Error)],
    }
}
