//! Activity domain - append-only audit trail of team events

pub mod models;

pub use models::{ActivityKind, TeamActivity};
