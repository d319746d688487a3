//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;

use crate::inbound::http::state::HttpState;
use crate::middleware::{AuthorizationPolicy, CorsFactory, HttpsRedirect};
use crate::registry::ServiceRegistry;
use crate::settings::Environment;

/// Everything the pipeline needs, extracted from the [`ServiceRegistry`].
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) http_state: web::Data<HttpState>,
    pub(crate) openapi: utoipa::openapi::OpenApi,
    pub(crate) cors: CorsFactory,
    pub(crate) authorization: Arc<dyn AuthorizationPolicy>,
    pub(crate) https_redirect: HttpsRedirect,
    pub(crate) environment: Environment,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Construct a server configuration from the composition root.
    ///
    /// The HTTPS redirect stage is created here so every worker shares its
    /// one-time warning flag.
    #[must_use]
    pub fn from_registry(registry: &ServiceRegistry) -> Self {
        let host = registry.host();
        Self {
            http_state: registry.http_state().clone(),
            openapi: registry.openapi().clone(),
            cors: registry.cors(),
            authorization: Arc::clone(registry.authorization()),
            https_redirect: HttpsRedirect::new(host.https_port),
            environment: host.environment,
            bind_addr: host.bind_addr,
        }
    }

    /// Override the bind address, e.g. with port 0 in tests.
    #[must_use]
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Whether developer diagnostics are installed.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}
