//! Governance data model
//!
//! Typed views of the proposal and vote rows produced by the indexers.
//! Rows arrive as JSON; everything here derives serde so the same types
//! are used for loading input and for echoing it back in results.

pub mod proposal;
pub mod vote;

pub use proposal::{Proposal, ScoresState, VoteType};
pub use vote::{Choice, Vote};
