//! Persistence-agnostic domain entities.

pub mod category;
pub mod news;
pub mod types;
pub mod user;
