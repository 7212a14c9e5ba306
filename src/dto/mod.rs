//! Flattened view models handed to templates.

pub mod categories;
pub mod news;
