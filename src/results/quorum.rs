//! Quorum evaluation.

use crate::model::{Proposal, VoteType};
use serde::{Deserialize, Serialize};

/// Quorum progress for a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuorumStatus {
    /// Required power, `None` when the proposal has no quorum.
    pub required: Option<f64>,
    /// Power on quorum-counting choices.
    pub counted: f64,
    /// Choice indices that count toward quorum.
    pub choices: Vec<usize>,
    pub reached: bool,
}

/// Choice indices whose power counts toward quorum.
///
/// An explicit `quorum_choices` list wins (out-of-range entries ignored).
/// Otherwise basic ballots count "For" and "Abstain", matching governor
/// contracts, and every other ballot type counts all choices.
pub fn quorum_choices(proposal: &Proposal) -> Vec<usize> {
    let count = proposal.choices.len();

    if let Some(explicit) = &proposal.quorum_choices {
        let mut choices: Vec<usize> = explicit.iter().copied().filter(|i| *i < count).collect();
        choices.sort_unstable();
        choices.dedup();
        return choices;
    }

    match proposal.vote_type {
        VoteType::Basic => proposal
            .choices
            .iter()
            .enumerate()
            .filter(|(_, label)| {
                let label = label.trim().to_lowercase();
                label == "for" || label == "abstain"
            })
            .map(|(i, _)| i)
            .collect(),
        _ => (0..count).collect(),
    }
}

/// Compare power on quorum-counting choices with the proposal's quorum.
pub fn evaluate_quorum(proposal: &Proposal, per_choice: &[f64]) -> QuorumStatus {
    let choices = quorum_choices(proposal);
    let counted: f64 = choices
        .iter()
        .filter_map(|i| per_choice.get(*i))
        .sum();

    let required = (proposal.quorum.is_finite() && proposal.quorum > 0.0).then_some(proposal.quorum);
    let reached = required.map_or(true, |q| counted >= q);

    QuorumStatus {
        required,
        counted,
        choices,
        reached,
    }
}
