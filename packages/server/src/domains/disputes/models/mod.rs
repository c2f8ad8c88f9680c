pub mod dispute;
pub mod vote;

pub use dispute::*;
pub use vote::*;
