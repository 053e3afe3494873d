//! dao-results - DAO Governance Result Aggregation
//!
//! Turns a proposal's raw vote rows into render-ready results.
//!
//! Key principles:
//! - Pure, synchronous aggregation over already-fetched rows
//! - One bad vote never fails a whole result (skipped, counted, logged)
//! - Hidden votes expose nothing numeric until scores are final
//! - Data access is injected through [`source::VoteSource`]

pub mod model;
pub mod results;
pub mod serialization;
pub mod source;
