//! Vote sources
//!
//! Where proposal and vote rows come from. Sources are constructed by the
//! caller and passed in; nothing in the crate holds a global client.

pub mod json;
pub mod mock;
pub mod traits;

pub use json::JsonFileSource;
pub use mock::MockVoteSource;
pub use traits::{resolve_proposal_id, LoadedVotes, SourceError, SourceResult, VoteSource};

use crate::model::Proposal;
use crate::results::{process_results, ResultsOptions, ResultsView};
use tracing::info;

/// Load a proposal and its votes from `source` and compute its results view.
pub async fn load_results<S: VoteSource + ?Sized>(
    source: &S,
    proposal_id: &str,
    options: &ResultsOptions,
) -> SourceResult<(Proposal, ResultsView)> {
    let proposal = source.proposal(proposal_id).await?;

    // Hidden results never need the vote rows
    if proposal.results_hidden() {
        info!(proposal = proposal_id, "results hidden until scores are final");
        let view = process_results(&proposal, &[], options);
        return Ok((proposal, view));
    }

    let loaded = source.votes(proposal_id).await?;
    info!(
        proposal = proposal_id,
        votes = loaded.votes.len(),
        malformed = loaded.malformed,
        "computing results"
    );
    let mut view = process_results(&proposal, &loaded.votes, options);

    // Unparseable rows are skipped votes too
    if let ResultsView::Visible(results) = &mut view {
        results.skipped_votes += loaded.malformed;
    }
    Ok((proposal, view))
}
