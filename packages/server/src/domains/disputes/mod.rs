//! Disputes domain - contesting a fine and settling the contest
//!
//! A dispute is opened by the fine's offender, collects at most one vote per
//! teammate, and ends either by an admin decision or, in community mode, when
//! positive votes reach the quorum frozen at creation. Approval deletes the fine.

pub mod activities;
pub mod data;
pub mod error;
pub mod models;

pub use data::{
    CastVoteInput, CreateDisputeInput, DisputeData, DisputeSummaryData, DisputeWithVotesData,
    ListDisputesQuery, MyVoteData, ResolveDisputeInput, VoteData,
};
pub use error::DisputeError;
pub use models::{DisputeStatus, DisputeSummary, DisputeVote, FineDispute};
