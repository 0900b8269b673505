//! Authentication: register, login, JWT.

mod handlers;
mod jwt;
mod service;

pub use handlers::{login, register};
pub use jwt::{Claims, TokenAuthority};
pub use service::PasswordService;
