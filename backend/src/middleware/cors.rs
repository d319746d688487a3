//! Permissive cross-origin policy.
//!
//! Every origin, method and header is allowed. `actix_cors::Cors` holds an
//! `Rc` internally, so the registry keeps a [`CorsFactory`] and each worker
//! builds its own middleware when the app is assembled.

use actix_cors::Cors;

/// Constructor for the CORS middleware installed on every worker.
pub type CorsFactory = fn() -> Cors;

/// Allow any origin, method and header, answering with a wildcard origin.
///
/// Credentials are not supported; browsers reject a wildcard origin on
/// credentialed requests.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use bookstore::middleware::permissive_cors;
///
/// let _app = App::new().service(web::scope("/api").wrap(permissive_cors()));
/// ```
#[must_use]
pub fn permissive_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .send_wildcard()
}
