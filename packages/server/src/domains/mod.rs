// Business domains
pub mod activity;
pub mod auth;
pub mod disputes;
pub mod fines;
pub mod teams;
