//! Outbound ports the domain depends on.
//!
//! Adapters live under `outbound/`; the in-memory repository doubles as the
//! fixture implementation for configurations without a database.

mod macros;
mod reachability_probe;
mod user_repository;

pub use reachability_probe::{ProbeError, ReachabilityProbe};
pub use user_repository::{InMemoryUserRepository, UserPersistenceError, UserRepository};
