//! Property-based tests for result aggregation
//!
//! Tests for:
//! - Conservation: per-choice power sums to the power of counted votes
//! - Exclusion: out-of-range choices never contribute power
//! - Bounds: percentages stay within 0-100 and bar widths sum to at most 100
//! - Hiding: hidden, non-final proposals never expose totals

use super::{process_results, tally::tally_votes, ResultsOptions, ResultsView};
use crate::model::{Choice, Proposal, ScoresState, Vote, VoteType};
use proptest::prelude::*;
use std::collections::BTreeMap;

const CHOICES: usize = 4;

fn test_proposal(vote_type: VoteType) -> Proposal {
    Proposal {
        id: "prop".to_string(),
        dao_id: "dao".to_string(),
        title: String::new(),
        choices: (0..CHOICES).map(|i| format!("Choice {}", i)).collect(),
        vote_type,
        quorum: 0.0,
        quorum_choices: None,
        hidden_vote: false,
        scores_state: ScoresState::Final,
        start_at: 1_000,
        end_at: 100_000,
    }
}

fn vote_type() -> impl Strategy<Value = VoteType> {
    prop_oneof![
        Just(VoteType::SingleChoice),
        Just(VoteType::Basic),
        Just(VoteType::Approval),
        Just(VoteType::Weighted),
        Just(VoteType::Quadratic),
        Just(VoteType::RankedChoice),
    ]
}

// Indices up to CHOICES + 2 so some votes fall out of range
fn choice() -> impl Strategy<Value = Choice> {
    prop_oneof![
        (-1i64..(CHOICES as i64 + 2)).prop_map(Choice::Single),
        prop::collection::vec(-1i64..(CHOICES as i64 + 2), 0..4).prop_map(Choice::Multiple),
        prop::collection::btree_map(0i64..(CHOICES as i64 + 2), 0.0f64..10.0, 0..4).prop_map(
            |m| Choice::Weighted(m.into_iter().map(|(k, w)| (k.to_string(), w)).collect::<BTreeMap<_, _>>())
        ),
    ]
}

fn votes() -> impl Strategy<Value = Vec<Vote>> {
    prop::collection::vec((choice(), 0.0f64..1_000_000.0, 0u64..50_000), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (choice, power, offset))| Vote {
                id: format!("v{}", i),
                proposal_id: "prop".to_string(),
                voter_address: format!("0x{:04x}", i),
                choice,
                voting_power: power,
                reason: None,
                created_at: 1_000 + offset,
            })
            .collect()
    })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    /// Property test: Conservation
    /// For every ballot type except approval, per-choice power sums to the
    /// voting power of the votes that were counted
    #[test]
    fn prop_power_conserved(vote_type in vote_type(), votes in votes()) {
        prop_assume!(vote_type != VoteType::Approval);

        let proposal = test_proposal(vote_type);
        let tally = tally_votes(&proposal, &votes);

        let counted_power: f64 = tally.counted.iter().map(|v| v.voting_power).sum();
        prop_assert!(close(tally.choice_power_sum(), counted_power));
        prop_assert!(close(tally.total_power, counted_power));
        prop_assert_eq!(tally.counted.len() + tally.skipped, votes.len());
    }

    /// Property test: Approval credits full power per approved choice
    #[test]
    fn prop_approval_full_power(votes in votes()) {
        let proposal = test_proposal(VoteType::Approval);
        let tally = tally_votes(&proposal, &votes);

        for counted in &tally.counted {
            for (_, power) in &counted.allocation {
                prop_assert_eq!(*power, counted.voting_power);
            }
        }
        for power in &tally.per_choice {
            prop_assert!(*power <= tally.total_power + 1e-6);
        }
    }

    /// Property test: Exclusion
    /// Allocations only ever reference valid choice indices
    #[test]
    fn prop_allocations_in_range(vote_type in vote_type(), votes in votes()) {
        let proposal = test_proposal(vote_type);
        let tally = tally_votes(&proposal, &votes);

        prop_assert_eq!(tally.per_choice.len(), CHOICES);
        for counted in &tally.counted {
            prop_assert!(!counted.allocation.is_empty());
            for (index, power) in &counted.allocation {
                prop_assert!(*index < CHOICES);
                prop_assert!(*power >= 0.0);
            }
        }
    }

    /// Property test: Bounds
    /// Winning percentage is within 0-100 and segment widths sum to <= 100
    #[test]
    fn prop_percentages_bounded(vote_type in vote_type(), votes in votes()) {
        let proposal = test_proposal(vote_type);
        let view = process_results(&proposal, &votes, &ResultsOptions::default());
        let results = view.visible().cloned();
        prop_assert!(results.is_some());
        let results = results.unwrap();

        prop_assert!(results.winning_percentage >= 0.0);
        prop_assert!(results.winning_percentage <= 100.0 + 0.01);

        let widths: f64 = results.segments.iter().map(|s| s.width).sum();
        prop_assert!(widths <= 100.0 + 0.01);

        if results.total_voting_power == 0.0 {
            prop_assert_eq!(results.winning_percentage, 0.0);
        }
    }

    /// Property test: Time series totals match the tally
    #[test]
    fn prop_series_matches_totals(vote_type in vote_type(), votes in votes()) {
        let proposal = test_proposal(vote_type);
        let view = process_results(&proposal, &votes, &ResultsOptions::default());
        let results = view.visible().cloned().unwrap();

        match results.time_series.last() {
            Some(last) => {
                for (choice, cumulative) in results.choices.iter().zip(&last.cumulative) {
                    prop_assert!(close(choice.power, *cumulative));
                }
            }
            None => prop_assert_eq!(results.counted_votes, 0),
        }
    }

    /// Property test: Hiding
    /// A hidden vote with non-final scores always takes the placeholder path
    #[test]
    fn prop_hidden_never_leaks(vote_type in vote_type(), votes in votes()) {
        let mut proposal = test_proposal(vote_type);
        proposal.hidden_vote = true;
        proposal.scores_state = ScoresState::Pending;

        let view = process_results(&proposal, &votes, &ResultsOptions::default());
        prop_assert!(matches!(view, ResultsView::Hidden(_)));
    }
}
