//! Transport upgrade: redirect plaintext requests to HTTPS.
//!
//! TLS terminates upstream, so the scheme comes from the connection info
//! (which honours `Forwarded` and `X-Forwarded-Proto`). Documentation paths
//! are served before this stage and are never redirected.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::doc::is_docs_path;

/// Middleware answering non-HTTPS requests with `307 Temporary Redirect`.
///
/// Without a configured HTTPS port the stage cannot build a target; it logs a
/// warning on the first request and lets traffic through.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use bookstore::middleware::HttpsRedirect;
///
/// let _app = App::new().wrap(HttpsRedirect::new(Some(443)));
/// ```
#[derive(Clone, Debug)]
pub struct HttpsRedirect {
    https_port: Option<u16>,
    warned: Arc<AtomicBool>,
}

impl HttpsRedirect {
    /// Redirect to `https_port`; `None` disables redirection.
    pub fn new(https_port: Option<u16>) -> Self {
        Self {
            https_port,
            warned: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HttpsRedirect
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = HttpsRedirectMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HttpsRedirectMiddleware {
            service,
            https_port: self.https_port,
            warned: Arc::clone(&self.warned),
        }))
    }
}

/// Service wrapper produced by [`HttpsRedirect`].
pub struct HttpsRedirectMiddleware<S> {
    service: S,
    https_port: Option<u16>,
    warned: Arc<AtomicBool>,
}

/// Build the HTTPS equivalent of a request target.
///
/// The port is omitted when it is the HTTPS default.
fn https_location(host: &str, https_port: u16, path_and_query: &str) -> String {
    let hostname = strip_port(host);
    if https_port == 443 {
        format!("https://{hostname}{path_and_query}")
    } else {
        format!("https://{hostname}:{https_port}{path_and_query}")
    }
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // IPv6 literal: keep the brackets.
        return rest.find(']').map_or(host, |end| &host[..end + 2]);
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}

impl<S, B> Service<ServiceRequest> for HttpsRedirectMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let is_https = req.connection_info().scheme().eq_ignore_ascii_case("https");
        if is_https || is_docs_path(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        let Some(https_port) = self.https_port else {
            if !self.warned.swap(true, Ordering::Relaxed) {
                warn!("failed to determine the https port for redirect");
            }
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        };

        let path_and_query = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path().to_owned(), |pq| pq.as_str().to_owned());
        let location = https_location(req.connection_info().host(), https_port, &path_and_query);
        let response = HttpResponse::TemporaryRedirect()
            .insert_header((header::LOCATION, location))
            .finish();
        Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test::{self}, web};
    use rstest::rstest;

    async fn call(
        https_port: Option<u16>,
        req: test::TestRequest,
    ) -> ServiceResponse<EitherBody<actix_web::body::BoxBody>> {
        let app = test::init_service(
            App::new()
                .wrap(HttpsRedirect::new(https_port))
                .default_service(web::to(|| async { HttpResponse::Ok().body("reached") })),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    fn location(res: &ServiceResponse<EitherBody<actix_web::body::BoxBody>>) -> Option<&str> {
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[rstest]
    #[case(443, "https://shop.example/api/books?page=2")]
    #[case(5001, "https://shop.example:5001/api/books?page=2")]
    #[actix_web::test]
    async fn plaintext_requests_are_redirected(#[case] port: u16, #[case] expected: &str) {
        let res = call(
            Some(port),
            test::TestRequest::get()
                .uri("/api/books?page=2")
                .insert_header((header::HOST, "shop.example:8080")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), Some(expected));
    }

    #[rstest]
    #[actix_web::test]
    async fn forwarded_https_passes_through() {
        let res = call(
            Some(443),
            test::TestRequest::get()
                .uri("/api/books")
                .insert_header(("x-forwarded-proto", "https")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn docs_are_not_redirected() {
        let res = call(
            Some(443),
            test::TestRequest::get().uri("/swagger/v1/swagger.json"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_port_passes_through() {
        let res = call(None, test::TestRequest::get().uri("/api/books")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(location(&res).is_none());
    }

    #[rstest]
    #[case("example.com:80", "example.com")]
    #[case("example.com", "example.com")]
    #[case("[::1]:8080", "[::1]")]
    #[case("[::1]", "[::1]")]
    fn strips_ports(#[case] host: &str, #[case] expected: &str) {
        assert_eq!(strip_port(host), expected);
    }
}
