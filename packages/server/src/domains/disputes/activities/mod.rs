//! Dispute actions - business logic functions
//!
//! Every mutating action comes in two forms: `*_in` runs inside a
//! caller-supplied transaction (the unit of work) and never commits, while the
//! plain form opens a transaction on the pool, runs `*_in` and commits.
//! Dropping the transaction on error rolls every write back.

mod cast_vote;
mod create_dispute;
mod queries;
mod resolve;

pub use cast_vote::*;
pub use create_dispute::*;
pub use queries::*;
pub use resolve::*;
