//! Database layer: pool and the PostgreSQL user service.

mod pool;
mod repositories;

pub use pool::{create_pool, DbPool};
pub use repositories::PgUserService;
