//! User-data services: the trait the handlers call and its in-memory backend.

pub mod memory;
pub mod user;

pub use memory::MemoryUserService;
pub use user::{ServiceResult, UserService, MAX_ITEMS};
