pub mod member;
pub mod membership;
pub mod team;
pub mod team_settings;

pub use member::*;
pub use membership::*;
pub use team::*;
pub use team_settings::*;
