//! Health endpoint reporting aggregated probe status.
//!
//! A liveness signal only: the report always carries the full probe detail,
//! and the status code follows the aggregate (200 when `ok`, 503 otherwise).

use actix_web::{HttpResponse, get, http::StatusCode, http::header, web};

use crate::domain::HealthReport;
use crate::inbound::http::state::HttpState;

/// Run the configured reachability probes and report the aggregate.
#[utoipa::path(
    get,
    path = "/health",
    security([]),
    responses(
        (status = 200, description = "All probes up", body = HealthReport),
        (status = 503, description = "At least one probe down", body = HealthReport)
    ),
    tags = ["health"],
    operation_id = "checkHealth"
)]
#[get("/health")]
pub async fn check_health(state: web::Data<HttpState>) -> HttpResponse {
    let report = state.health.check().await;
    let status = if report.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    HttpResponse::build(status)
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test as actix_test};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use url::Url;

    use super::*;
    use crate::domain::ports::{InMemoryUserRepository, ProbeError, ReachabilityProbe};
    use crate::domain::{HealthService, ProbeTarget, UserService};

    struct FixedProbe {
        up: bool,
    }

    #[async_trait]
    impl ReachabilityProbe for FixedProbe {
        async fn ping(&self, _target: &ProbeTarget) -> Result<(), ProbeError> {
            if self.up {
                Ok(())
            } else {
                Err(ProbeError::unreachable("connection refused"))
            }
        }
    }

    fn state_with_probe(up: bool) -> HttpState {
        let users = Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new())));
        let targets = vec![ProbeTarget::new(
            "framework-docs",
            Url::parse("https://docs.example.com/").expect("valid url"),
        )];
        let health = Arc::new(HealthService::new(Arc::new(FixedProbe { up }), targets));
        HttpState::new(users, health)
    }

    async fn call_health(state: HttpState) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(check_health),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health").to_request(),
        )
        .await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value = serde_json::from_slice(&body).expect("report JSON");
        (status, value)
    }

    #[actix_web::test]
    async fn reports_ok_with_200_when_probe_resolves() {
        let (status, value) = call_health(state_with_probe(true)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value.get("status"), Some(&json!("ok")));
        assert_eq!(
            value.pointer("/info/framework-docs/status"),
            Some(&json!("up"))
        );
    }

    #[actix_web::test]
    async fn reports_error_with_503_when_probe_fails() {
        let (status, value) = call_health(state_with_probe(false)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(value.get("status"), Some(&json!("error")));
        assert_eq!(
            value.pointer("/error/framework-docs/status"),
            Some(&json!("down"))
        );
        assert_eq!(
            value.pointer("/details/framework-docs/status"),
            Some(&json!("down"))
        );
    }
}
