//! Vote tallying.

use std::collections::HashMap;

use super::ConsensusVote;

/// Count of identical values, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteGroup {
    pub value: String,
    pub count: usize,
}

/// Groups successful votes by value. Groups keep the order their value was first seen.
#[must_use]
pub fn tally(votes: &[ConsensusVote]) -> Vec<VoteGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<VoteGroup> = Vec::new();

    for value in votes.iter().filter(|v| v.success).filter_map(|v| v.result.as_deref()) {
        if let Some(&i) = index.get(value) {
            groups[i].count += 1;
        } else {
            index.insert(value, groups.len());
            groups.push(VoteGroup { value: value.to_string(), count: 1 });
        }
    }

    groups
}

/// The largest group; ties go to the group seen first.
#[must_use]
pub fn find_consensus(groups: &[VoteGroup]) -> Option<&VoteGroup> {
    groups.iter().fold(None, |best: Option<&VoteGroup>, group| match best {
        Some(b) if b.count >= group.count => Some(b),
        _ => Some(group),
    })
}

/// Flags each successful vote that disagrees with `consensus`.
pub fn flag_mismatches(votes: &mut [ConsensusVote], consensus: Option<&str>) {
    for vote in votes {
        vote.is_mismatch = match (consensus, vote.result.as_deref()) {
            (Some(expected), Some(actual)) => vote.success && actual != expected,
            _ => false,
        };
    }
}
