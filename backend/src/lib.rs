//! BookStore service library.
//!
//! Layout follows ports and adapters: `domain` holds entities and ports,
//! `inbound::http` the REST handlers, `outbound::persistence` the Diesel
//! adapters. `registry`, `server` and `bootstrap` compose them into a
//! running process.

pub mod bootstrap;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod registry;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
