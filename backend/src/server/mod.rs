//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Condition;
use actix_web::{App, HttpServer, web};
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

use crate::doc::OPENAPI_JSON_PATH;
use crate::inbound::http::configure_api;
use crate::inbound::http::error::not_found;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::middleware::{Authorize, Diagnostics, Trace};

/// Assemble the request pipeline.
///
/// Actix applies the last `wrap` first, so the stages below are listed
/// innermost to outermost. A request meets them as trace, diagnostics,
/// HTTPS redirect, authorization, then routing. Swagger paths are skipped by
/// every stage after diagnostics. CORS wraps the catch-all scope holding
/// the health probes and `/api`, so it also covers unmatched routes but
/// never the Swagger services registered ahead of it.
pub fn build_app(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let ServerConfig {
        http_state,
        openapi,
        cors,
        authorization,
        https_redirect,
        environment,
        bind_addr: _,
    } = config;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Authorize::new(authorization))
        .wrap(https_redirect)
        .wrap(Condition::new(environment.is_development(), Diagnostics))
        .wrap(Trace)
        .service(SwaggerUi::new("/swagger/{_:.*}").url(OPENAPI_JSON_PATH, openapi))
        .service(
            web::scope("")
                .wrap(cors())
                .service(ready)
                .service(live)
                .service(web::scope("/api").configure(configure_api)),
        )
        .default_service(web::to(not_found))
}

/// Construct an Actix HTTP server bound to the configured address.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let bind_addr = config.bind_addr();
    let server = HttpServer::new(move || build_app(health_state.clone(), config.clone()))
        .bind(bind_addr)?;
    for addr in server.addrs() {
        info!(%addr, "listening");
    }
    Ok(server.run())
}
