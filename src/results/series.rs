//! Time-bucketed voting power for trend charts.

use super::tally::CountedVote;
use crate::model::Proposal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bucket width (1 hour)
pub const DEFAULT_BUCKET: Duration = Duration::from_secs(3600);

/// Power cast within one bucket, plus the running totals at its end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Bucket start, unix seconds
    pub start: u64,
    /// Bucket end (exclusive), unix seconds
    pub end: u64,
    pub votes: usize,
    /// Power credited per choice within this bucket
    pub power: Vec<f64>,
    /// Power credited per choice from the first bucket up to this one
    pub cumulative: Vec<f64>,
}

/// Group counted votes into fixed-width buckets.
///
/// Buckets are aligned to the proposal start, or to the first vote when
/// votes predate the start. Only buckets that received votes are emitted,
/// in chronological order.
pub fn build_time_series(
    proposal: &Proposal,
    counted: &[CountedVote],
    bucket: Duration,
) -> Vec<TimeBucket> {
    let width = bucket.as_secs().max(1);
    let choice_count = proposal.choices.len();

    let first_vote = match counted.iter().map(|v| v.created_at).min() {
        Some(ts) => ts,
        None => return Vec::new(),
    };
    let origin = if proposal.start_at > 0 && proposal.start_at <= first_vote {
        proposal.start_at
    } else {
        first_vote
    };

    let mut ordered: Vec<&CountedVote> = counted.iter().collect();
    ordered.sort_by_key(|v| v.created_at);

    let mut series: Vec<TimeBucket> = Vec::new();
    let mut running = vec![0.0; choice_count];

    for vote in ordered {
        let index = (vote.created_at - origin) / width;
        let start = origin.saturating_add(index.saturating_mul(width));

        if series.last().map(|b| b.start) != Some(start) {
            series.push(TimeBucket {
                start,
                end: start.saturating_add(width),
                votes: 0,
                power: vec![0.0; choice_count],
                cumulative: running.clone(),
            });
        }

        // Just pushed or matched above
        let Some(current) = series.last_mut() else {
            continue;
        };
        current.votes += 1;
        for (choice, power) in &vote.allocation {
            current.power[*choice] += power;
            current.cumulative[*choice] += power;
            running[*choice] += power;
        }
    }

    series
}
