//! Vote records and ballot choices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The choice a ballot carries, in the shape the indexer stores it.
///
/// Indices are signed so that malformed rows (e.g. `-1`) still load and are
/// rejected during tallying instead of failing the whole vote set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    /// `2`
    Single(i64),
    /// `[0, 2]` (approval set or ranking, most preferred first)
    Multiple(Vec<i64>),
    /// `{"0": 2, "2": 1}` (weight per choice index)
    Weighted(BTreeMap<String, f64>),
}

impl Choice {
    /// Resolve a raw index against the number of choices on the proposal.
    pub fn resolve(raw: i64, choice_count: usize) -> Option<usize> {
        usize::try_from(raw).ok().filter(|i| *i < choice_count)
    }
}

/// A single ballot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: String,
    pub proposal_id: String,
    pub voter_address: String,
    pub choice: Choice,
    pub voting_power: f64,

    #[serde(default)]
    pub reason: Option<String>,

    /// Unix seconds
    pub created_at: u64,
}

impl Vote {
    /// Voting power is usable when it is finite and non-negative.
    pub fn has_valid_power(&self) -> bool {
        self.voting_power.is_finite() && self.voting_power >= 0.0
    }
}
