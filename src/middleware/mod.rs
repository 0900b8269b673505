//! Request extractors that gate protected routes.

pub mod auth;

pub use auth::AuthUser;
