//! Port abstraction for user persistence adapters and their errors.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::user::{NewUser, User, UserChanges, UserId, UserWithPosts};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    ///
    /// Constraint violations (for example a duplicate email) are not given
    /// their own variant; they surface as `Query` failures, matching the
    /// pass-through contract of the service.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Storage port for user records.
///
/// Listing and single reads always attach related posts; the inclusion is a
/// structural property of the port rather than a per-call flag.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return the stored record with its assigned id.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch every user with its posts attached.
    async fn list_with_posts(&self) -> Result<Vec<UserWithPosts>, UserPersistenceError>;

    /// Fetch a single user with posts attached.
    async fn find_with_posts(
        &self,
        id: UserId,
    ) -> Result<Option<UserWithPosts>, UserPersistenceError>;

    /// Fetch a user record without posts; used for existence checks.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Apply the supplied fields to an existing record and return the result.
    ///
    /// A record that vanished since the caller's existence check surfaces as
    /// a `Query` failure, not as an absence.
    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError>;

    /// Delete the record with the given id.
    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: i32,
    users: BTreeMap<i32, User>,
}

/// Map-backed [`UserRepository`] used when no database is configured and by
/// handler tests. Ids are assigned sequentially from 1. Users stored here
/// never have posts.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<InMemoryState>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        state.next_id += 1;
        let id = UserId::new(state.next_id);
        let stored = User::new(id, user.email.clone(), user.name.clone());
        state.users.insert(id.value(), stored.clone());
        Ok(stored)
    }

    async fn list_with_posts(&self) -> Result<Vec<UserWithPosts>, UserPersistenceError> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        Ok(state
            .users
            .values()
            .cloned()
            .map(|user| UserWithPosts {
                user,
                posts: Vec::new(),
            })
            .collect())
    }

    async fn find_with_posts(
        &self,
        id: UserId,
    ) -> Result<Option<UserWithPosts>, UserPersistenceError> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        Ok(state.users.get(&id.value()).cloned().map(|user| UserWithPosts {
            user,
            posts: Vec::new(),
        }))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        Ok(state.users.get(&id.value()).cloned())
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        let current = state
            .users
            .get(&id.value())
            .cloned()
            .ok_or_else(|| UserPersistenceError::query("record not found"))?;

        let email = changes.email.clone().unwrap_or_else(|| current.email().clone());
        let name = changes.name.clone().unwrap_or_else(|| current.name().clone());
        let updated = User::new(id, email, name);
        state.users.insert(id.value(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        state
            .users
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| UserPersistenceError::query("record not found"))
    }
}

fn poisoned() -> UserPersistenceError {
    UserPersistenceError::query("repository state lock poisoned")
}
