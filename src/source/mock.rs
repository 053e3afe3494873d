//! Mock Vote Source for Testing
//!
//! In-memory rows, no filesystem or database.

use super::traits::*;
use crate::model::{Proposal, Vote};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Mock vote source for testing
#[derive(Clone, Default)]
pub struct MockVoteSource {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    proposals: BTreeMap<String, Proposal>,
    votes: Vec<Vote>,
    vote_loads: usize,
}

impl MockVoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a proposal
    pub fn add_proposal(&self, proposal: Proposal) {
        let mut state = self.state.lock().unwrap();
        state.proposals.insert(proposal.id.clone(), proposal);
    }

    /// Add a vote row (any proposal)
    pub fn add_vote(&self, vote: Vote) {
        self.state.lock().unwrap().votes.push(vote);
    }

    /// Number of `votes()` calls, for assertions
    pub fn vote_loads(&self) -> usize {
        self.state.lock().unwrap().vote_loads
    }
}

#[async_trait]
impl VoteSource for MockVoteSource {
    async fn proposal_ids(&self) -> SourceResult<Vec<String>> {
        Ok(self.state.lock().unwrap().proposals.keys().cloned().collect())
    }

    async fn proposal(&self, proposal_id: &str) -> SourceResult<Proposal> {
        self.state
            .lock()
            .unwrap()
            .proposals
            .get(proposal_id)
            .cloned()
            .ok_or_else(|| SourceError::ProposalNotFound(proposal_id.to_string()))
    }

    async fn votes(&self, proposal_id: &str) -> SourceResult<LoadedVotes> {
        let mut state = self.state.lock().unwrap();
        state.vote_loads += 1;
        Ok(LoadedVotes {
            votes: state
                .votes
                .iter()
                .filter(|v| v.proposal_id == proposal_id)
                .cloned()
                .collect(),
            malformed: 0,
        })
    }
}
