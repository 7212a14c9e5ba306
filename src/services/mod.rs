//! Business logic shared by the HTTP handlers.
//!
//! Services are generic over the repository traits so they can run against
//! the Diesel repository in production and an in-memory one in tests.

pub mod auth;
pub mod categories;
pub mod errors;
pub mod news;
pub mod public;

pub use errors::{ServiceError, ServiceResult};
