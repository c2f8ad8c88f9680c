//! Teams domain - membership and per-team dispute settings

pub mod models;

pub use models::{
    DisputeConfig, DisputeMode, Member, Team, TeamMembership, TeamRole, TeamSettings,
    DEFAULT_VOTES_REQUIRED,
};
