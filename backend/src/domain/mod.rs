//! Domain model: entities, services, errors, and outbound ports.

pub mod error;
pub mod health;
pub mod ports;
pub mod user;
pub mod users_service;

pub use error::{Error, ErrorCode};
pub use health::{HealthReport, HealthService, ProbeState, ProbeStatus, ProbeTarget, ReportStatus};
pub use user::{
    Email, NewUser, Post, User, UserChanges, UserId, UserName, UserValidationError, UserWithPosts,
};
pub use users_service::UserService;
