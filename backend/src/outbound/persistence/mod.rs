//! PostgreSQL persistence adapters built on Diesel.
//!
//! The domain talks to repository ports only; this module supplies their
//! database-backed implementations along with the shared connection pool and
//! the generated schema definitions.

mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
