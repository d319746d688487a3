//! End-to-end checks of the assembled request pipeline.
//!
//! Every test builds the real app through `build_app` so the stage order
//! matches what the server runs.

#[path = "support/app.rs"]
mod app_support;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::dev::ServiceRequest;
use actix_web::http::{Method, StatusCode, header};
use actix_web::{test, web};
use bookstore::domain::{Error, ErrorCode, TRACE_ID_HEADER};
use bookstore::inbound::http::health::HealthState;
use bookstore::middleware::{AuthorizationPolicy, PolicyDecision};
use bookstore::registry::{HostOptions, ServiceRegistry};
use bookstore::server::{ServerConfig, build_app};
use bookstore::settings::Environment;
use rstest::rstest;
use serde_json::Value;

use app_support::{broken_books_state, fixture_registry};

struct DenyAll;

impl AuthorizationPolicy for DenyAll {
    fn evaluate(&self, _req: &ServiceRequest) -> PolicyDecision {
        PolicyDecision::Deny {
            reason: "closed for stocktaking".to_owned(),
        }
    }
}

fn host(environment: Environment, https_port: Option<u16>) -> HostOptions {
    HostOptions {
        environment,
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        https_port,
    }
}

const SHOP_ORIGIN: &str = "https://shop.example";

fn header_str<'a>(headers: &'a header::HeaderMap, name: header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

macro_rules! init_app {
    ($registry:expr) => {
        test::init_service(build_app(
            web::Data::new(HealthState::new()),
            ServerConfig::from_registry(&$registry),
        ))
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn api_responses_carry_permissive_cors_headers() {
    let registry = fixture_registry(host(Environment::Production, None));
    let app = init_app!(registry);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/books")
            .insert_header((header::ORIGIN, SHOP_ORIGIN))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let headers = res.headers();
    assert_eq!(header_str(headers, header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    assert!(headers.contains_key(TRACE_ID_HEADER));
}

#[rstest]
#[actix_web::test]
async fn preflight_is_answered_without_reaching_handlers() {
    let registry = fixture_registry(host(Environment::Production, None));
    let app = init_app!(registry);

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/categories/3")
        .insert_header((header::ORIGIN, SHOP_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert!(res.status().is_success());
    let headers = res.headers();
    assert_eq!(header_str(headers, header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    assert!(
        header_str(headers, header::ACCESS_CONTROL_ALLOW_METHODS)
            .is_some_and(|methods| methods.contains("PUT"))
    );
    assert!(
        header_str(headers, header::ACCESS_CONTROL_ALLOW_HEADERS)
            .is_some_and(|allowed| allowed.contains("content-type"))
    );
}

#[rstest]
#[case("/api/authors")]
#[case("/nowhere")]
#[actix_web::test]
async fn unmatched_routes_are_json_not_found_with_cors(#[case] uri: &str) {
    let registry = fixture_registry(host(Environment::Production, None));
    let app = init_app!(registry);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(uri)
            .insert_header((header::ORIGIN, SHOP_ORIGIN))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        header_str(res.headers(), header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("*")
    );
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::NotFound);
    assert!(body.trace_id().is_some());
}

#[rstest]
#[actix_web::test]
async fn plaintext_requests_redirect_before_authorization() {
    let registry = fixture_registry(host(Environment::Production, Some(8443)))
        .with_authorization(Arc::new(DenyAll));
    let app = init_app!(registry);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/books?page=2")
            .insert_header((header::HOST, "books.example"))
            .insert_header((header::ORIGIN, SHOP_ORIGIN))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        header_str(res.headers(), header::LOCATION),
        Some("https://books.example:8443/api/books?page=2")
    );
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    assert!(!res
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[rstest]
#[actix_web::test]
async fn forwarded_https_reaches_authorization() {
    let registry = fixture_registry(host(Environment::Production, Some(8443)))
        .with_authorization(Arc::new(DenyAll));
    let app = init_app!(registry);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/books")
            .insert_header(("x-forwarded-proto", "https"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::Forbidden);
}

#[rstest]
#[actix_web::test]
async fn docs_are_served_without_redirect_and_list_every_route() {
    let registry = fixture_registry(host(Environment::Production, Some(8443)))
        .with_authorization(Arc::new(DenyAll));
    let app = init_app!(registry);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/swagger/v1/swagger.json")
            .insert_header((header::ORIGIN, SHOP_ORIGIN))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(!res
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    let doc: Value = test::read_body_json(res).await;
    assert_eq!(doc["info"]["title"], "BookStore API");
    assert_eq!(doc["info"]["version"], "v1");
    let paths = doc["paths"].as_object().expect("paths object");
    for path in [
        "/api/categories",
        "/api/categories/{id}",
        "/api/books",
        "/api/books/{id}",
        "/api/books/get-books-by-category/{categoryId}",
        "/health/ready",
        "/health/live",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}

#[rstest]
#[actix_web::test]
async fn production_redacts_internal_errors() {
    let registry = fixture_registry(host(Environment::Production, None))
        .with_http_state(broken_books_state());
    let app = init_app!(registry);

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/books").to_request())
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.message(), "Internal server error");
}

#[rstest]
#[actix_web::test]
async fn development_renders_diagnostics_page() {
    let registry = fixture_registry(host(Environment::Development, None))
        .with_http_state(broken_books_state());
    let app = init_app!(registry);

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/books").to_request())
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body = test::read_body(res).await;
    let page = std::str::from_utf8(&body).expect("utf8 page");
    assert!(page.contains("Request: GET /api/books"));
    assert!(page.contains("disk on fire"));
    assert!(page.contains("Trace id: "));
}

#[rstest]
#[actix_web::test]
async fn health_probes_follow_readiness() {
    let registry: ServiceRegistry = fixture_registry(host(Environment::Production, None));
    let health = web::Data::new(HealthState::new());
    let app = test::init_service(build_app(
        health.clone(),
        ServerConfig::from_registry(&registry),
    ))
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    health.mark_ready();
    let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}
