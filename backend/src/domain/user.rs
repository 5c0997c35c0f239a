//! User entity and its validated value objects.
//!
//! Identifiers are database-assigned integers. Email and name are validated
//! newtypes so a constructed [`User`] is well-formed by construction; email
//! *uniqueness* is the database's concern, never enforced here.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum accepted email length (RFC 5321 octet limit).
pub const EMAIL_MAX: usize = 254;
/// Maximum accepted display name length.
pub const NAME_MAX: usize = 100;

/// Validation errors returned by the value object constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    EmptyName,
    NameTooLong { max: usize },
}

impl UserValidationError {
    /// Stable machine-readable code for HTTP error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmailTooLong { .. } => "email_too_long",
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmailTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Database-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw integer value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Validated email address.
///
/// The check is deliberately shallow (shape only); deliverability and
/// uniqueness are out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`] from owned input.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.trim() != email {
            return Err(UserValidationError::InvalidEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }

        let (local, domain) = email
            .split_once('@')
            .ok_or(UserValidationError::InvalidEmail)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(UserValidationError::InvalidEmail);
        }

        Ok(Self(email))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Human-readable user name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if name.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct User {
    #[schema(value_type = i32, example = 1)]
    id: UserId,
    #[schema(value_type = String, example = "ada@example.com")]
    email: Email,
    #[schema(value_type = String, example = "Ada Lovelace")]
    name: UserName,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, email: Email, name: UserName) -> Self {
        Self { id, email, name }
    }

    /// Database-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }
}

/// Fields for a user yet to be persisted; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: Email,
    pub name: UserName,
}

/// Partial field replacement for an existing user.
///
/// Declared as its own type rather than derived from [`NewUser`] so the
/// accepted shape stays visible and statically checkable. Absent fields are
/// left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<Email>,
    pub name: Option<UserName>,
}

impl UserChanges {
    /// True when no field is supplied; such an update is a no-op.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none()
    }
}

/// Post owned by a user. Opaque to this service: posts are only ever
/// read back alongside their author, never created or mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post identifier.
    pub id: i32,
    /// Post title.
    pub title: String,
    /// Optional body text.
    pub content: Option<String>,
    /// Whether the post is published.
    pub published: bool,
    /// Identifier of the owning user.
    pub author_id: i32,
}

/// A user together with its eagerly loaded posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserWithPosts {
    /// The user record, serialised inline.
    #[serde(flatten)]
    pub user: User,
    /// Related posts, always present (possibly empty).
    pub posts: Vec<Post>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn email(raw: &str) -> Email {
        Email::new(raw).expect("valid email")
    }

    fn name(raw: &str) -> UserName {
        UserName::new(raw).expect("valid name")
    }

    #[rstest]
    #[case("ada@example.com")]
    #[case("a.b+tag@sub.example.org")]
    fn email_accepts_plausible_addresses(#[case] raw: &str) {
        assert_eq!(email(raw).as_ref(), raw);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("plainaddress", UserValidationError::InvalidEmail)]
    #[case("@example.com", UserValidationError::InvalidEmail)]
    #[case("ada@", UserValidationError::InvalidEmail)]
    #[case("ada@nodot", UserValidationError::InvalidEmail)]
    #[case("ada@.example.com", UserValidationError::InvalidEmail)]
    #[case(" ada@example.com", UserValidationError::InvalidEmail)]
    fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[test]
    fn email_rejects_overlong_input() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        assert_eq!(
            Email::new(raw),
            Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    #[case("", UserValidationError::EmptyName)]
    #[case("  \t", UserValidationError::EmptyName)]
    fn name_rejects_blank_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserName::new(raw), Err(expected));
    }

    #[test]
    fn name_rejects_overlong_input() {
        assert_eq!(
            UserName::new("x".repeat(NAME_MAX + 1)),
            Err(UserValidationError::NameTooLong { max: NAME_MAX })
        );
    }

    #[test]
    fn user_serialises_flat_fields() {
        let user = User::new(UserId::new(7), email("ada@example.com"), name("Ada"));
        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(
            value,
            serde_json::json!({ "id": 7, "email": "ada@example.com", "name": "Ada" })
        );
    }

    #[test]
    fn user_with_posts_serialises_posts_inline() {
        let aggregate = UserWithPosts {
            user: User::new(UserId::new(1), email("ada@example.com"), name("Ada")),
            posts: vec![Post {
                id: 10,
                title: "Hello".into(),
                content: None,
                published: true,
                author_id: 1,
            }],
        };
        let value = serde_json::to_value(&aggregate).expect("serialise aggregate");
        assert_eq!(value.get("id"), Some(&serde_json::json!(1)));
        let posts = value.get("posts").and_then(|p| p.as_array()).expect("posts array");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].get("authorId"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn changes_report_emptiness() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            name: Some(name("Grace")),
            ..UserChanges::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn user_validation_errors_expose_stable_codes() {
        assert_eq!(UserValidationError::InvalidEmail.code(), "invalid_email");
        assert_eq!(
            UserValidationError::NameTooLong { max: NAME_MAX }.code(),
            "name_too_long"
        );
    }
}
