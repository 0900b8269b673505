//! HTTP request handlers.

pub mod http;
pub mod user;

pub use http::*;
pub use user::*;
