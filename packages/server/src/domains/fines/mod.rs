//! Fines domain - the records a dispute contests

pub mod models;

pub use models::{Fine, NewFine};
