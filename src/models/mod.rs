//! Data models shared by handlers and user services.

pub mod user;

pub use user::{Collection, Identity, LoginRequest, LoginResponse, RegisterRequest, User};
