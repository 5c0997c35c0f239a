//! Server construction: state wiring, middleware, and route registration.

mod config;

pub use config::{ConfigError, ServerConfig};

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, body::MessageBody, http::header, middleware::DefaultHeaders, web};
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{InMemoryUserRepository, UserRepository};
use crate::domain::{HealthService, ProbeTarget, UserService};
use crate::inbound::http::error::json_config;
use crate::inbound::http::health::check_health;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::middleware::Trace;
use crate::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use crate::outbound::probe::HttpProbe;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Assemble the handler state from configuration.
///
/// Selects the PostgreSQL repository when `DATABASE_URL` is configured,
/// otherwise the in-memory fixture so the server stays runnable without a
/// database.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the connection pool or the probe HTTP
/// client cannot be built.
pub async fn build_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let repository: Arc<dyn UserRepository> = match config.database_url() {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            Arc::new(DieselUserRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; user records are kept in memory");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let probe = HttpProbe::new(PROBE_TIMEOUT).map_err(std::io::Error::other)?;
    let targets = vec![ProbeTarget::new("framework-docs", config.probe_url().clone())];

    Ok(HttpState::new(
        Arc::new(UserService::new(repository)),
        Arc::new(HealthService::new(Arc::new(probe), targets)),
    ))
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = match allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allowed_methods(["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
}

fn build_app(
    state: HttpState,
    allowed_origin: Option<&str>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let api = web::scope("/api/v1")
        .service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user);

    let app = App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(Trace)
        .wrap(cors(allowed_origin))
        .wrap(security_headers())
        .service(api)
        .service(check_health);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the HTTP server bound to the configured address.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: &ServerConfig, state: HttpState) -> std::io::Result<Server> {
    let allowed_origin = config.allowed_origin().map(str::to_owned);
    let server = HttpServer::new(move || build_app(state.clone(), allowed_origin.as_deref()))
        .bind(config.bind_addr())?
        .run();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::json;

    use super::*;

    async fn in_memory_state() -> HttpState {
        let config = ServerConfig::from_lookup(|_| None).expect("defaults parse");
        build_state(&config).await.expect("state builds")
    }

    #[actix_web::test]
    async fn default_config_serves_versioned_user_routes() {
        let app = actix_test::init_service(build_app(in_memory_state().await, None)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(json!({"email": "ada@example.com", "name": "Ada"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unversioned_user_routes_are_not_exposed() {
        let app = actix_test::init_service(build_app(in_memory_state().await, None)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/users").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn responses_carry_trace_and_security_headers() {
        let app = actix_test::init_service(build_app(in_memory_state().await, None)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users")
                .to_request(),
        )
        .await;

        assert!(response.headers().contains_key("x-trace-id"));
        assert_eq!(
            response
                .headers()
                .get("x-content-type-options")
                .map(|v| v.to_str().expect("ascii header")),
            Some("nosniff")
        );
    }

    #[actix_web::test]
    async fn cors_preflight_reflects_configured_origin() {
        let app = actix_test::init_service(build_app(
            in_memory_state().await,
            Some("https://app.example.com"),
        ))
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::with_uri("/api/v1/users")
                .method(actix_web::http::Method::OPTIONS)
                .insert_header((header::ORIGIN, "https://app.example.com"))
                .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
                .to_request(),
        )
        .await;

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().expect("ascii header")),
            Some("https://app.example.com")
        );
    }
}
