//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated OpenAPI specification covering the user
//! CRUD endpoints and the health probe. Served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{
    Error, ErrorCode, HealthReport, Post, ProbeState, ProbeStatus, ReportStatus, User,
    UserWithPosts,
};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User directory API",
        description = "CRUD access to user records with related posts, plus a reachability health probe."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::check_health,
    ),
    components(schemas(
        CreateUserRequest,
        UpdateUserRequest,
        User,
        Post,
        UserWithPosts,
        Error,
        ErrorCode,
        HealthReport,
        ProbeStatus,
        ProbeState,
        ReportStatus,
    )),
    tags(
        (name = "users", description = "User record lifecycle"),
        (name = "health", description = "Dependency reachability checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> Vec<String> {
        ApiDoc::openapi().paths.paths.keys().cloned().collect()
    }

    #[test]
    fn registers_all_user_and_health_paths() {
        let paths = paths();

        assert!(paths.contains(&"/api/v1/users".to_owned()));
        assert!(paths.contains(&"/api/v1/users/{id}".to_owned()));
        assert!(paths.contains(&"/health".to_owned()));
    }

    #[test]
    fn registers_error_schema_with_code_and_message() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        let error_schema = components.schemas.get("Error").expect("Error schema");

        let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(object)) =
            error_schema
        else {
            panic!("expected object schema for Error");
        };
        assert!(object.properties.contains_key("code"));
        assert!(object.properties.contains_key("message"));
    }
}
