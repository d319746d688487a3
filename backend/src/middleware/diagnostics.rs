//! Developer diagnostics page for server errors.
//!
//! Only installed in the development environment. A 5xx response that
//! carries a handler error is replaced with a plaintext page showing the
//! unredacted error. Responses without an attached error pass unchanged.

use std::fmt::Write as _;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{Method, header};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::Error as DomainError;

/// Middleware rendering developer diagnostics for server errors.
///
/// # Examples
/// ```
/// use actix_web::{App, middleware::Condition};
/// use bookstore::middleware::Diagnostics;
///
/// let development = true;
/// let _app = App::new().wrap(Condition::new(development, Diagnostics));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Diagnostics;

impl<S, B> Transform<S, ServiceRequest> for Diagnostics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = DiagnosticsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DiagnosticsMiddleware { service }))
    }
}

/// Service wrapper produced by [`Diagnostics`].
pub struct DiagnosticsMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for DiagnosticsMiddleware<S>
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
        let method = req.method().clone();
        let path = req.path().to_owned();
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            if !res.status().is_server_error() {
                return Ok(res.map_into_left_body());
            }
            let Some(page) = res
                .response()
                .error()
                .map(|err| render_page(err, &method, &path))
            else {
                return Ok(res.map_into_left_body());
            };
            let status = res.status();
            let (req, original) = res.into_parts();
            let mut replacement = HttpResponse::build(status);
            for (name, value) in original.headers() {
                if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
                    replacement.append_header((name.clone(), value.clone()));
                }
            }
            let response = replacement
                .content_type("text/plain; charset=utf-8")
                .body(page);
            Ok(ServiceResponse::new(req, response).map_into_right_body())
        })
    }
}

fn render_page(err: &Error, method: &Method, path: &str) -> String {
    let mut page = String::from("An unhandled error occurred while processing the request.\n\n");
    // Writing to a String cannot fail.
    let _ = writeln!(page, "Request: {method} {path}");
    match err.as_error::<DomainError>() {
        Some(domain) => {
            let _ = writeln!(page, "Code: {:?}", domain.code());
            let _ = writeln!(page, "Message: {}", domain.message());
            if let Some(trace_id) = domain.trace_id() {
                let _ = writeln!(page, "Trace id: {trace_id}");
            }
            if let Some(details) = domain.details() {
                let _ = writeln!(page, "Details: {details}");
            }
        }
        None => {
            let _ = writeln!(page, "Error: {err}");
            let _ = writeln!(page, "Debug: {err:?}");
        }
    }
    page
}
