//! Typed ID definitions for all domain entities.
//!
//! ```rust
//! use fines_core::common::{DisputeId, FineId};
//!
//! let fine_id: FineId = FineId::new();
//! let dispute_id: DisputeId = DisputeId::new();
//! // let wrong: DisputeId = fine_id; // does not compile
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Member entities (users of the app).
pub struct Member;

/// Marker type for Team entities (a shared fines pool).
pub struct Team;

/// Marker type for Fine entities.
pub struct Fine;

/// Marker type for FineDispute entities.
pub struct FineDispute;

/// Marker type for a single vote cast on a dispute.
pub struct DisputeVote;

/// Marker type for audit trail entries.
pub struct TeamActivity;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type MemberId = Id<Member>;

pub type TeamId = Id<Team>;

pub type FineId = Id<Fine>;

pub type DisputeId = Id<FineDispute>;

pub type VoteId = Id<DisputeVote>;

pub type ActivityId = Id<TeamActivity>;
