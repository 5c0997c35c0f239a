//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer, never exposed to the
//! domain. They exist solely to satisfy Diesel's type requirements for
//! queries and mutations.

use diesel::prelude::*;

use super::schema::{posts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub name: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
}

/// Changeset for partial updates. `None` fields are skipped by Diesel, so
/// absent update fields leave the stored value untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangesetRow<'a> {
    pub email: Option<&'a str>,
    pub name: Option<&'a str>,
}

/// Row struct for reading posts alongside their author.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(UserRow, foreign_key = author_id))]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i32,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: i32,
}
