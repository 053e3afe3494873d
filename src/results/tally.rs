//! Per-ballot-type tallying.
//!
//! Every vote is turned into a [`CountedVote`]: the share of its voting
//! power credited to each choice. Votes that cannot be attributed to a valid
//! choice are skipped and counted, never fatal.

use crate::model::{Choice, Proposal, Vote, VoteType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A vote that made it into the tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountedVote {
    pub vote_id: String,
    pub voter_address: String,
    pub voting_power: f64,
    pub created_at: u64,
    /// (choice index, power credited to that choice)
    pub allocation: Vec<(usize, f64)>,
}

/// Why a vote was left out of the tally.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Voting power is negative, NaN or infinite.
    InvalidPower,
    /// A referenced choice index is outside the proposal's choices.
    OutOfRange(i64),
    /// A weight key is not an integer index.
    MalformedIndex(String),
    /// No choice selected, or all weights zero.
    EmptySelection,
    /// A weight is negative or not finite, or the weights sum to infinity.
    InvalidWeight,
    /// The choice shape does not fit the ballot type.
    ShapeMismatch,
}

/// Raw output of tallying a vote set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    /// Aggregated power, indexed like `Proposal::choices`.
    pub per_choice: Vec<f64>,
    pub counted: Vec<CountedVote>,
    pub skipped: usize,
    /// Sum of voting power over counted votes.
    pub total_power: f64,
}

impl Tally {
    /// Sum of per-choice power. Equals `total_power` for every ballot type
    /// except approval, where one vote credits several choices.
    pub fn choice_power_sum(&self) -> f64 {
        self.per_choice.iter().sum()
    }
}

/// Tally a proposal's votes according to its ballot type.
pub fn tally_votes(proposal: &Proposal, votes: &[Vote]) -> Tally {
    let choice_count = proposal.choices.len();
    let mut tally = Tally {
        per_choice: vec![0.0; choice_count],
        ..Tally::default()
    };

    for vote in votes {
        match allocate(proposal.vote_type, vote, choice_count) {
            Ok(allocation) => tally.counted.push(CountedVote {
                vote_id: vote.id.clone(),
                voter_address: vote.voter_address.clone(),
                voting_power: vote.voting_power,
                created_at: vote.created_at,
                allocation,
            }),
            Err(reason) => {
                debug!(
                    proposal = %proposal.id,
                    vote = %vote.id,
                    reason = ?reason,
                    "skipping vote"
                );
                tally.skipped += 1;
            }
        }
    }

    if proposal.vote_type == VoteType::Quadratic {
        rescale_quadratic(&mut tally.counted);
    }

    for counted in &tally.counted {
        tally.total_power += counted.voting_power;
        for (index, power) in &counted.allocation {
            tally.per_choice[*index] += power;
        }
    }

    if tally.skipped > 0 {
        warn!(
            proposal = %proposal.id,
            skipped = tally.skipped,
            counted = tally.counted.len(),
            "votes with invalid choices were excluded from results"
        );
    }

    tally
}

fn allocate(
    vote_type: VoteType,
    vote: &Vote,
    choice_count: usize,
) -> Result<Vec<(usize, f64)>, SkipReason> {
    if !vote.has_valid_power() {
        return Err(SkipReason::InvalidPower);
    }
    let power = vote.voting_power;

    match vote_type {
        VoteType::SingleChoice | VoteType::Basic => {
            let index = match &vote.choice {
                Choice::Single(raw) => resolve(*raw, choice_count)?,
                Choice::Multiple(raws) if raws.len() == 1 => resolve(raws[0], choice_count)?,
                Choice::Multiple(raws) if raws.is_empty() => {
                    return Err(SkipReason::EmptySelection)
                }
                _ => return Err(SkipReason::ShapeMismatch),
            };
            Ok(vec![(index, power)])
        }
        VoteType::Approval => {
            let raws: &[i64] = match &vote.choice {
                Choice::Single(raw) => std::slice::from_ref(raw),
                Choice::Multiple(raws) => raws.as_slice(),
                Choice::Weighted(_) => return Err(SkipReason::ShapeMismatch),
            };
            let mut approved = BTreeSet::new();
            for raw in raws {
                approved.insert(resolve(*raw, choice_count)?);
            }
            if approved.is_empty() {
                return Err(SkipReason::EmptySelection);
            }
            Ok(approved.into_iter().map(|i| (i, power)).collect())
        }
        VoteType::Weighted | VoteType::Quadratic => {
            let weights = match &vote.choice {
                Choice::Single(raw) => vec![(resolve(*raw, choice_count)?, 1.0)],
                Choice::Weighted(map) => {
                    let mut weights = Vec::with_capacity(map.len());
                    for (key, weight) in map {
                        let raw: i64 = key
                            .trim()
                            .parse()
                            .map_err(|_| SkipReason::MalformedIndex(key.clone()))?;
                        if !weight.is_finite() || *weight < 0.0 {
                            return Err(SkipReason::InvalidWeight);
                        }
                        weights.push((resolve(raw, choice_count)?, *weight));
                    }
                    weights
                }
                Choice::Multiple(_) => return Err(SkipReason::ShapeMismatch),
            };
            let weight_sum: f64 = weights.iter().map(|(_, w)| w).sum();
            if !weight_sum.is_finite() {
                return Err(SkipReason::InvalidWeight);
            }
            if weight_sum <= 0.0 {
                return Err(SkipReason::EmptySelection);
            }
            // Share first: w / weight_sum <= 1 keeps the product within power
            Ok(merge(
                weights
                    .into_iter()
                    .filter(|(_, w)| *w > 0.0)
                    .map(|(i, w)| (i, power * (w / weight_sum))),
            ))
        }
        VoteType::RankedChoice => {
            let first = match &vote.choice {
                Choice::Single(raw) => *raw,
                Choice::Multiple(raws) => *raws.first().ok_or(SkipReason::EmptySelection)?,
                Choice::Weighted(_) => return Err(SkipReason::ShapeMismatch),
            };
            Ok(vec![(resolve(first, choice_count)?, power)])
        }
    }
}

fn resolve(raw: i64, choice_count: usize) -> Result<usize, SkipReason> {
    Choice::resolve(raw, choice_count).ok_or(SkipReason::OutOfRange(raw))
}

/// Combine duplicate indices (e.g. `{"1": 1, "01": 1}`).
fn merge(entries: impl Iterator<Item = (usize, f64)>) -> Vec<(usize, f64)> {
    let mut merged: Vec<(usize, f64)> = Vec::new();
    for (index, power) in entries {
        let found = merged.iter().position(|(i, _)| *i == index);
        match found {
            Some(pos) => merged[pos].1 += power,
            None => merged.push((index, power)),
        }
    }
    merged.sort_by_key(|(i, _)| *i);
    merged
}

/// Replace linear allocations with square roots, then scale so the grand
/// total still equals the voting power cast.
fn rescale_quadratic(counted: &mut [CountedVote]) {
    let total_power: f64 = counted.iter().map(|c| c.voting_power).sum();
    let sqrt_sum: f64 = counted
        .iter()
        .flat_map(|c| c.allocation.iter())
        .map(|(_, p)| p.sqrt())
        .sum();

    let scale = if sqrt_sum > 0.0 {
        total_power / sqrt_sum
    } else {
        0.0
    };

    for vote in counted.iter_mut() {
        for (_, power) in vote.allocation.iter_mut() {
            *power = power.sqrt() * scale;
        }
    }
}
