//! Users API handlers.
//!
//! Pure adapters: bind the payload and path parameters, validate DTO shape,
//! and forward to the user service unchanged. Domain errors are translated
//! to HTTP statuses by the shared `ResponseError` impl, never here.
//!
//! ```text
//! POST   /api/v1/users      {"email":"ada@example.com","name":"Ada"}
//! GET    /api/v1/users
//! GET    /api/v1/users/1
//! PUT    /api/v1/users/1    {"name":"Renamed"}
//! PATCH  /api/v1/users/1    {"email":"new@example.com"}
//! DELETE /api/v1/users/1
//! ```

use actix_web::{HttpResponse, delete, get, post, route, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Email, Error, NewUser, User, UserChanges, UserId, UserName, UserValidationError, UserWithPosts,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Creation payload for `POST /api/v1/users`. Unknown fields are rejected.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    /// Unique email address.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Partial update payload for `PUT`/`PATCH /api/v1/users/{id}`.
///
/// Declared as its own type rather than derived from [`CreateUserRequest`]
/// so the optional shape stays visible. Unknown fields are rejected; an
/// empty object is a valid no-op update.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    /// Replacement email address, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Replacement display name, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn map_validation_error(field: &'static str, err: &UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": err.code() }))
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        let email = Email::new(value.email).map_err(|err| map_validation_error("email", &err))?;
        let name = UserName::new(value.name).map_err(|err| map_validation_error("name", &err))?;
        Ok(Self { email, name })
    }
}

impl TryFrom<UpdateUserRequest> for UserChanges {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        let email = value
            .email
            .map(Email::new)
            .transpose()
            .map_err(|err| map_validation_error("email", &err))?;
        let name = value
            .name
            .map(UserName::new)
            .transpose()
            .map_err(|err| map_validation_error("name", &err))?;
        Ok(Self { email, name })
    }
}

/// Create a user with exactly the supplied fields.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let input = NewUser::try_from(payload.into_inner())?;
    let user = state.users.create(input).await?;
    Ok(HttpResponse::Created().json(user))
}

/// List every user with related posts attached.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users with posts", body = [UserWithPosts]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserWithPosts>>> {
    let users = state.users.find_all().await?;
    Ok(web::Json(users))
}

/// Fetch a single user with related posts attached.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User with posts", body = UserWithPosts),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserWithPosts>> {
    let user = state.users.find_one(UserId::new(path.into_inner())).await?;
    Ok(web::Json(user))
}

/// Partially update a user. Accepts both `PUT` and `PATCH`.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = UpdateUserRequest,
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[route("/users/{id}", method = "PUT", method = "PATCH")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let changes = UserChanges::try_from(payload.into_inner())?;
    let user = state
        .users
        .update(UserId::new(path.into_inner()), changes)
        .await?;
    Ok(web::Json(user))
}

/// Delete a user and return its pre-deletion state.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deleted user", body = User),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<User>> {
    let user = state.users.remove(UserId::new(path.into_inner())).await?;
    Ok(web::Json(user))
}
