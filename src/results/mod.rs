//! Vote Result Aggregation
//!
//! Turns a proposal's raw vote rows into results a UI can render without
//! further arithmetic: per-choice power, winner and winning percentage,
//! quorum progress, a time series for trend charts and bar segments with
//! colours.
//!
//! Hidden-vote proposals whose scores are not final never reach the
//! numeric path: [`process_results`] returns [`ResultsView::Hidden`] before
//! any vote is tallied.

pub mod display;
pub mod quorum;
pub mod series;
pub mod tally;

#[cfg(test)]
mod proptests;

use crate::model::{Proposal, ScoresState, Vote, VoteType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

pub use display::{choice_color, display_segments, render_text, Segment};
pub use quorum::{evaluate_quorum, QuorumStatus};
pub use series::{build_time_series, TimeBucket, DEFAULT_BUCKET};
pub use tally::{tally_votes, CountedVote, Tally};

/// Placeholder shown instead of numbers for hidden votes.
pub const HIDDEN_LABEL: &str = "Hidden";

/// Knobs for a results computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsOptions {
    /// Width of a time series bucket.
    pub bucket: Duration,
}

impl Default for ResultsOptions {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET,
        }
    }
}

/// Aggregated result for one choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceResult {
    pub index: usize,
    pub label: String,
    pub power: f64,
    /// Share of total voting power, 0-100.
    pub percentage: f64,
    pub color: String,
}

/// The leading choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub index: usize,
    pub label: String,
    pub power: f64,
    pub percentage: f64,
}

/// Fully computed results for a visible proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedResults {
    pub proposal_id: String,
    pub vote_type: VoteType,
    pub choices: Vec<ChoiceResult>,
    /// Sum of voting power over counted votes.
    pub total_voting_power: f64,
    pub winner: Option<Winner>,
    /// Winner's share of total voting power; 0 when nothing was cast.
    pub winning_percentage: f64,
    pub counted_votes: usize,
    pub skipped_votes: usize,
    pub quorum: QuorumStatus,
    pub time_series: Vec<TimeBucket>,
    pub segments: Vec<Segment>,
    /// Proposal is configured as a hidden vote.
    pub hidden_vote: bool,
    pub scores_state: ScoresState,
}

impl ProcessedResults {
    /// Aggregated power keyed by choice label (duplicate labels are summed).
    pub fn power_by_label(&self) -> BTreeMap<&str, f64> {
        let mut map = BTreeMap::new();
        for choice in &self.choices {
            *map.entry(choice.label.as_str()).or_insert(0.0) += choice.power;
        }
        map
    }

    /// Power for a single label.
    pub fn power_of(&self, label: &str) -> Option<f64> {
        self.power_by_label().get(label).copied()
    }

    /// Results of a hidden vote that became final carry this note.
    pub fn results_available(&self) -> bool {
        self.hidden_vote && self.scores_state.is_final()
    }
}

/// Placeholder for results that must not be shown yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenResults {
    pub proposal_id: String,
    pub vote_type: VoteType,
    pub choices: Vec<String>,
    pub scores_state: ScoresState,
}

/// What a caller may render for a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResultsView {
    Hidden(HiddenResults),
    Visible(ProcessedResults),
}

impl ResultsView {
    pub fn is_hidden(&self) -> bool {
        matches!(self, ResultsView::Hidden(_))
    }

    pub fn visible(&self) -> Option<&ProcessedResults> {
        match self {
            ResultsView::Visible(results) => Some(results),
            ResultsView::Hidden(_) => None,
        }
    }
}

/// Compute what may be shown for a proposal given its votes.
///
/// Votes for other proposals are ignored. Invalid votes are skipped and
/// reported in `skipped_votes`.
pub fn process_results(
    proposal: &Proposal,
    votes: &[Vote],
    options: &ResultsOptions,
) -> ResultsView {
    if proposal.results_hidden() {
        debug!(proposal = %proposal.id, "hidden vote, results withheld");
        return ResultsView::Hidden(HiddenResults {
            proposal_id: proposal.id.clone(),
            vote_type: proposal.vote_type,
            choices: proposal.choices.clone(),
            scores_state: proposal.scores_state,
        });
    }

    let own: Vec<Vote> = votes
        .iter()
        .filter(|v| v.proposal_id == proposal.id)
        .cloned()
        .collect();
    if own.len() != votes.len() {
        debug!(
            proposal = %proposal.id,
            foreign = votes.len() - own.len(),
            "ignoring votes for other proposals"
        );
    }

    let tally = tally_votes(proposal, &own);
    let total = tally.total_power;

    let choices: Vec<ChoiceResult> = proposal
        .choices
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let power = tally.per_choice[index];
            ChoiceResult {
                index,
                label: label.clone(),
                power,
                percentage: percentage(power, total),
                color: choice_color(label, index).to_string(),
            }
        })
        .collect();

    let winner = leading_choice(&choices).map(|c| Winner {
        index: c.index,
        label: c.label.clone(),
        power: c.power,
        percentage: c.percentage,
    });
    let winning_percentage = winner.as_ref().map_or(0.0, |w| w.percentage);

    let quorum = evaluate_quorum(proposal, &tally.per_choice);
    let time_series = build_time_series(proposal, &tally.counted, options.bucket);

    let mut results = ProcessedResults {
        proposal_id: proposal.id.clone(),
        vote_type: proposal.vote_type,
        choices,
        total_voting_power: total,
        winner,
        winning_percentage,
        counted_votes: tally.counted.len(),
        skipped_votes: tally.skipped,
        quorum,
        time_series,
        segments: Vec::new(),
        hidden_vote: proposal.hidden_vote,
        scores_state: proposal.scores_state,
    };
    results.segments = display_segments(&results.choices);

    debug!(
        proposal = %results.proposal_id,
        counted = results.counted_votes,
        skipped = results.skipped_votes,
        total = results.total_voting_power,
        "results processed"
    );

    ResultsView::Visible(results)
}

/// Share of `total`, 0-100, defined as 0 when `total` is not positive.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part * 100.0 / total
    } else {
        0.0
    }
}

/// Highest power wins; ties go to the lowest index. No winner without power.
fn leading_choice(choices: &[ChoiceResult]) -> Option<&ChoiceResult> {
    let mut best: Option<&ChoiceResult> = None;
    for choice in choices {
        if choice.power <= 0.0 {
            continue;
        }
        if best.map_or(true, |b| choice.power > b.power) {
            best = Some(choice);
        }
    }
    best
}
