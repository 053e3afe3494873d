//! Benchmarks for result aggregation
//!
//! Large DAOs see tens of thousands of votes per proposal; results are
//! recomputed on every page render, so aggregation must stay well under
//! a millisecond per thousand votes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dao_results::model::{Choice, Proposal, ScoresState, Vote, VoteType};
use dao_results::results::{process_results, tally_votes, ResultsOptions};
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const CHOICES: usize = 5;

fn test_proposal(vote_type: VoteType) -> Proposal {
    Proposal {
        id: "bench".to_string(),
        dao_id: "bench-dao".to_string(),
        title: String::new(),
        choices: (0..CHOICES).map(|i| format!("Choice {}", i)).collect(),
        vote_type,
        quorum: 1_000_000.0,
        quorum_choices: None,
        hidden_vote: false,
        scores_state: ScoresState::Final,
        start_at: 1_700_000_000,
        end_at: 1_700_604_800,
    }
}

/// Create a vote set with a choice shape matching the ballot type
fn create_votes(vote_type: VoteType, count: usize) -> Vec<Vote> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);

    (0..count)
        .map(|i| {
            let choice = match vote_type {
                VoteType::Approval | VoteType::RankedChoice => Choice::Multiple(
                    (0..rng.gen_range(1..=CHOICES))
                        .map(|_| rng.gen_range(0..CHOICES as i64))
                        .collect(),
                ),
                VoteType::Weighted | VoteType::Quadratic => {
                    let weights: BTreeMap<String, f64> = (0..CHOICES)
                        .map(|c| (c.to_string(), rng.gen_range(0.0..10.0)))
                        .collect();
                    Choice::Weighted(weights)
                }
                _ => Choice::Single(rng.gen_range(0..CHOICES as i64)),
            };

            Vote {
                id: format!("v{}", i),
                proposal_id: "bench".to_string(),
                voter_address: format!("0x{:040x}", i),
                choice,
                voting_power: rng.gen_range(0.0..100_000.0),
                reason: None,
                created_at: 1_700_000_000 + rng.gen_range(0..604_800),
            }
        })
        .collect()
}

fn benchmark_tally_by_type(c: &mut Criterion) {
    let mut group = c.benchmark_group("tally_10k_votes");

    for vote_type in [
        VoteType::SingleChoice,
        VoteType::Approval,
        VoteType::Weighted,
        VoteType::Quadratic,
        VoteType::RankedChoice,
    ] {
        let proposal = test_proposal(vote_type);
        let votes = create_votes(vote_type, 10_000);

        group.bench_with_input(
            BenchmarkId::from_parameter(vote_type),
            &votes,
            |b, votes| b.iter(|| tally_votes(black_box(&proposal), black_box(votes))),
        );
    }

    group.finish();
}

fn benchmark_process_results_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_results");
    let proposal = test_proposal(VoteType::SingleChoice);
    let options = ResultsOptions::default();

    for size in [100, 1_000, 10_000, 50_000] {
        let votes = create_votes(VoteType::SingleChoice, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &votes, |b, votes| {
            b.iter(|| process_results(black_box(&proposal), black_box(votes), &options))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_tally_by_type,
    benchmark_process_results_scaling
);
criterion_main!(benches);
