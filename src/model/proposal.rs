//! Proposal records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ballot type of a proposal.
///
/// Determines how a vote's choice is interpreted and how its voting power
/// is distributed across choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoteType {
    /// One choice, full power.
    SingleChoice,
    /// For / Against / Abstain style ballot, full power to one choice.
    Basic,
    /// Any number of choices, full power to each.
    Approval,
    /// Power split proportionally over a weight distribution.
    Weighted,
    /// Weight distribution, scored on square roots of allocated power.
    Quadratic,
    /// Ordered preferences; only the first preference is tallied.
    RankedChoice,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::SingleChoice => "single-choice",
            VoteType::Basic => "basic",
            VoteType::Approval => "approval",
            VoteType::Weighted => "weighted",
            VoteType::Quadratic => "quadratic",
            VoteType::RankedChoice => "ranked-choice",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finality of the indexer's tallied scores.
///
/// Anything the indexer reports other than `final` is treated as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoresState {
    Final,
    #[default]
    #[serde(other)]
    Pending,
}

impl ScoresState {
    pub fn is_final(&self) -> bool {
        matches!(self, ScoresState::Final)
    }
}

/// A governance proposal as stored by the indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub dao_id: String,

    #[serde(default)]
    pub title: String,

    /// Choice labels, addressed by 0-based index from votes.
    pub choices: Vec<String>,

    pub vote_type: VoteType,

    /// Voting power required for quorum (0 = no quorum).
    #[serde(default)]
    pub quorum: f64,

    /// Choices whose power counts toward quorum.
    ///
    /// When absent, basic ballots count "For" and "Abstain" and every other
    /// ballot type counts all choices.
    #[serde(default)]
    pub quorum_choices: Option<Vec<usize>>,

    #[serde(default)]
    pub hidden_vote: bool,

    #[serde(default)]
    pub scores_state: ScoresState,

    /// Unix seconds
    pub start_at: u64,
    /// Unix seconds
    pub end_at: u64,
}

impl Proposal {
    /// Whether real numbers must be withheld for this proposal.
    pub fn results_hidden(&self) -> bool {
        self.hidden_vote && !self.scores_state.is_final()
    }

    /// Label for a choice index, if it is in range.
    pub fn choice_label(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }
}
