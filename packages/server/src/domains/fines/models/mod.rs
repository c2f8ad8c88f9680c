pub mod fine;

pub use fine::*;
