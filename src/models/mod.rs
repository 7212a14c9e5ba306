//! Diesel row types mirroring `schema.rs`, plus the server configuration.

pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod news;
pub mod user;
