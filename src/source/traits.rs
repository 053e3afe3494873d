//! Vote Source Trait Abstractions
//!
//! The aggregator never fetches data itself. Callers construct a source
//! and hand it in, so tests can use MockVoteSource in place of real storage.

use crate::model::{Proposal, Vote};
use async_trait::async_trait;
use std::path::PathBuf;

/// Result type for vote source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Vote source errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in '{path}': {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    #[error("Ambiguous proposal: {0} proposals available, pick one by id")]
    AmbiguousProposal(usize),
}

/// Vote rows loaded for one proposal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedVotes {
    pub votes: Vec<Vote>,
    /// Rows that belong to the proposal (or name none) but could not be
    /// parsed as votes.
    pub malformed: usize,
}

/// Supplier of proposal and vote rows.
#[async_trait]
pub trait VoteSource: Send + Sync {
    /// Identifiers of the proposals this source can serve.
    async fn proposal_ids(&self) -> SourceResult<Vec<String>>;

    /// Load one proposal.
    async fn proposal(&self, proposal_id: &str) -> SourceResult<Proposal>;

    /// Load every vote cast on a proposal, in any order.
    async fn votes(&self, proposal_id: &str) -> SourceResult<LoadedVotes>;
}

/// Pick the proposal to work on: the requested id, or the only one available.
pub async fn resolve_proposal_id<S: VoteSource + ?Sized>(
    source: &S,
    requested: Option<&str>,
) -> SourceResult<String> {
    if let Some(id) = requested {
        return Ok(id.to_string());
    }

    let mut ids = source.proposal_ids().await?;
    match ids.len() {
        0 => Err(SourceError::ProposalNotFound("<none>".to_string())),
        1 => Ok(ids.remove(0)),
        n => Err(SourceError::AmbiguousProposal(n)),
    }
}
