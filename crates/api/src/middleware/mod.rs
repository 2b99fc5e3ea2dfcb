//! Request middleware and extractors.

pub mod admin;
pub mod auth;

pub use admin::{AdminUser, require_admin};
pub use auth::{AuthUser, auth_middleware};
