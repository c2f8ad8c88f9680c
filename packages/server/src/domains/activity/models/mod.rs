pub mod team_activity;

pub use team_activity::*;
