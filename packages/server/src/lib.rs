// Fines Pool - Dispute API Core
//
// Members contest fines levied against them; a contest is settled by a team
// admin or, in community mode, by a quorum of teammates' votes.
// Architecture follows domain-driven design: models own their SQL, actions
// own the business rules, and the HTTP layer only validates and maps errors.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
