//! Authorization stage.
//!
//! The service ships with [`AllowAll`]; the stage exists so a real policy can
//! be slotted in without touching the pipeline. A denial short-circuits with
//! `403 forbidden`.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::doc::is_docs_path;
use crate::domain::Error as DomainError;

/// Outcome of evaluating a policy against a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny { reason: String },
}

/// Decides whether a request may reach its endpoint.
pub trait AuthorizationPolicy: Send + Sync {
    fn evaluate(&self, req: &ServiceRequest) -> PolicyDecision;
}

/// Policy admitting every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl AuthorizationPolicy for AllowAll {
    fn evaluate(&self, _req: &ServiceRequest) -> PolicyDecision {
        PolicyDecision::Allow
    }
}

/// Middleware applying an [`AuthorizationPolicy`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use bookstore::middleware::Authorize;
///
/// let _app = App::new().wrap(Authorize::default());
/// ```
#[derive(Clone)]
pub struct Authorize {
    policy: Arc<dyn AuthorizationPolicy>,
}

impl Authorize {
    pub fn new(policy: Arc<dyn AuthorizationPolicy>) -> Self {
        Self { policy }
    }
}

impl Default for Authorize {
    fn default() -> Self {
        Self::new(Arc::new(AllowAll))
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authorize
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthorizeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthorizeMiddleware {
            service,
            policy: Arc::clone(&self.policy),
        }))
    }
}

/// Service wrapper produced by [`Authorize`].
pub struct AuthorizeMiddleware<S> {
    service: S,
    policy: Arc<dyn AuthorizationPolicy>,
}

impl<S, B> Service<ServiceRequest> for AuthorizeMiddleware<S>
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
        let decision = if is_docs_path(req.path()) {
            PolicyDecision::Allow
        } else {
            self.policy.evaluate(&req)
        };
        match decision {
            PolicyDecision::Allow => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            PolicyDecision::Deny { reason } => {
                debug!(path = req.path(), %reason, "request denied by policy");
                let response = req.error_response(DomainError::forbidden(reason));
                Box::pin(async move { Ok(response.map_into_right_body()) })
            }
        }
    }
}
