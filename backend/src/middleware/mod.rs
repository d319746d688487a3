//! Request middleware.
//!
//! Purpose: Define the request pipeline stages. The server wraps them so a
//! request meets them in this order: trace, diagnostics (development only),
//! HTTPS redirect, authorization, routing, then CORS on every non-docs
//! route.

pub mod authorization;
pub mod cors;
pub mod diagnostics;
pub mod https_redirect;
pub mod trace;

pub use authorization::{AllowAll, AuthorizationPolicy, Authorize, PolicyDecision};
pub use cors::{CorsFactory, permissive_cors};
pub use diagnostics::Diagnostics;
pub use https_redirect::HttpsRedirect;
pub use trace::Trace;
