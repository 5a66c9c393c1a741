//! Request middleware.

pub mod auth;

pub use auth::{AuthUser, Identity, guard_middleware};
