//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation. Regenerate with `diesel print-schema` when
//! the migrations change.

diesel::table! {
    /// Registered users. `email` carries a unique constraint enforced by the
    /// database, not by application code.
    users (id) {
        /// Primary key, assigned by the `serial` sequence.
        id -> Int4,
        /// Unique email address.
        email -> Varchar,
        /// Display name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Posts owned by users; read-only as far as this service is concerned.
    posts (id) {
        /// Primary key.
        id -> Int4,
        /// Post title.
        title -> Varchar,
        /// Optional body text.
        content -> Nullable<Text>,
        /// Whether the post is published.
        published -> Bool,
        /// Owning user.
        author_id -> Int4,
    }
}

diesel::joinable!(posts -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(posts, users);
