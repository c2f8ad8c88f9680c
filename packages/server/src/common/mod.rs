// Common types and utilities shared across the application

pub mod db;
pub mod entity_ids;
pub mod id;
pub mod money;
pub mod validation;

pub use db::DbTimeouts;
pub use entity_ids::*;
pub use id::Id;
pub use validation::ValidationError;
