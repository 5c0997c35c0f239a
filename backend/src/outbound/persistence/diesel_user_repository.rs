//! PostgreSQL-backed [`UserRepository`] implementation using Diesel ORM.
//!
//! A thin adapter: translates between Diesel rows and domain types and maps
//! database failures onto the port's error variants. Constraint violations
//! (duplicate email) are deliberately not classified; they surface as `Query`
//! failures, matching the pass-through contract.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUser, Post, User, UserChanges, UserId, UserName, UserWithPosts};

use super::models::{NewUserRow, PostRow, UserChangesetRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{posts, users};

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => UserPersistenceError::query("database error"),
        _ => UserPersistenceError::query("database error"),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let id = UserId::new(row.id);
    let email = Email::new(row.email).map_err(|err| {
        UserPersistenceError::query(format!("stored user {} has invalid email: {err}", row.id))
    })?;
    let name = UserName::new(row.name).map_err(|err| {
        UserPersistenceError::query(format!("stored user {} has invalid name: {err}", row.id))
    })?;
    Ok(User::new(id, email, name))
}

fn row_to_post(row: PostRow) -> Post {
    Post {
        id: row.id,
        title: row.title,
        content: row.content,
        published: row.published,
        author_id: row.author_id,
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                email: user.email.as_ref(),
                name: user.name.as_ref(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn list_with_posts(&self) -> Result<Vec<UserWithPosts>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user_rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let post_rows: Vec<PostRow> = PostRow::belonging_to(&user_rows)
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let grouped = post_rows.grouped_by(&user_rows);
        user_rows
            .into_iter()
            .zip(grouped)
            .map(|(user_row, user_posts)| {
                Ok(UserWithPosts {
                    user: row_to_user(user_row)?,
                    posts: user_posts.into_iter().map(row_to_post).collect(),
                })
            })
            .collect()
    }

    async fn find_with_posts(
        &self,
        id: UserId,
    ) -> Result<Option<UserWithPosts>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let maybe_row: Option<UserRow> = users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(user_row) = maybe_row else {
            return Ok(None);
        };

        let post_rows: Vec<PostRow> = posts::table
            .filter(posts::author_id.eq(id.value()))
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Some(UserWithPosts {
            user: row_to_user(user_row)?,
            posts: post_rows.into_iter().map(row_to_post).collect(),
        }))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let maybe_row: Option<UserRow> = users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        maybe_row.map(row_to_user).transpose()
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // A record deleted between the caller's existence check and this
        // statement surfaces as Diesel's NotFound, mapped to a Query failure.
        let row: UserRow = diesel::update(users::table.find(id.value()))
            .set(&UserChangesetRow {
                email: changes.email.as_ref().map(AsRef::as_ref),
                name: changes.name.as_ref().map(AsRef::as_ref),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(id.value()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(UserPersistenceError::query("record not found"));
        }
        Ok(())
    }
}
