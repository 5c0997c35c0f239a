//! User lifecycle service: the one component with decision logic.
//!
//! Every mutation against an existing record is guarded by an explicit
//! existence check; the check and the mutation are two separate repository
//! calls, so a concurrent delete between them surfaces as a storage-level
//! failure rather than `NotFound`. That benign race is accepted.

use std::sync::Arc;

use tracing::debug;

use crate::domain::error::Error;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::user::{NewUser, User, UserChanges, UserId, UserWithPosts};

/// CRUD service over the [`UserRepository`] port.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}

fn not_found(id: UserId) -> Error {
    Error::not_found(format!("User #{id} not found"))
}

impl UserService {
    /// Create a service backed by the given repository.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Persist a new user with exactly the given fields.
    ///
    /// No duplicate check happens here; a duplicate email fails inside the
    /// storage layer and propagates as an opaque failure.
    pub async fn create(&self, input: NewUser) -> Result<User, Error> {
        let stored = self
            .repository
            .insert(&input)
            .await
            .map_err(map_persistence_error)?;
        debug!(user_id = stored.id().value(), "user created");
        Ok(stored)
    }

    /// Return every user, each with its related posts eagerly attached.
    pub async fn find_all(&self) -> Result<Vec<UserWithPosts>, Error> {
        self.repository
            .list_with_posts()
            .await
            .map_err(map_persistence_error)
    }

    /// Return the user with the given id and its posts attached.
    pub async fn find_one(&self, id: UserId) -> Result<UserWithPosts, Error> {
        self.repository
            .find_with_posts(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| not_found(id))
    }

    /// Apply the supplied fields to an existing user after an existence check.
    ///
    /// An empty change set is accepted and returns the record unchanged
    /// without touching the update operation.
    pub async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, Error> {
        let existing = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| not_found(id))?;

        if changes.is_empty() {
            return Ok(existing);
        }

        self.repository
            .update(id, &changes)
            .await
            .map_err(map_persistence_error)
    }

    /// Delete an existing user after an existence check.
    ///
    /// Returns the record as fetched by the check, i.e. its pre-deletion
    /// state.
    pub async fn remove(&self, id: UserId) -> Result<User, Error> {
        let existing = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| not_found(id))?;

        self.repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        debug!(user_id = id.value(), "user deleted");
        Ok(existing)
    }
}
