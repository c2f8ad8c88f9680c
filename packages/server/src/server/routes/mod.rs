// HTTP routes
pub mod disputes;
pub mod health;

pub use disputes::*;
pub use health::*;
