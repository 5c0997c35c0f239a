//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{HealthService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User lifecycle service.
    pub users: Arc<UserService>,
    /// Reachability probe aggregator.
    pub health: Arc<HealthService>,
}

impl HttpState {
    /// Bundle the services handlers depend on.
    pub fn new(users: Arc<UserService>, health: Arc<HealthService>) -> Self {
        Self { users, health }
    }
}
