//! Auth domain - bearer token verification

pub mod jwt;

pub use jwt::{Claims, JwtService};
