//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every endpoint of the inbound HTTP layer together
//! with the request/response DTOs and the error schema wrappers. The
//! document is served by Swagger UI and printed by the `openapi-dump` binary.

use crate::inbound::http::books::{BookRequest, BookResponse};
use crate::inbound::http::categories::{CategoryRequest, CategoryResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// Path prefix served by Swagger UI.
pub const SWAGGER_UI_PATH: &str = "/swagger";
/// Location of the OpenAPI JSON document.
pub const OPENAPI_JSON_PATH: &str = "/swagger/v1/swagger.json";

/// Whether `path` belongs to the documentation endpoints.
///
/// # Examples
/// ```
/// use bookstore::doc::is_docs_path;
///
/// assert!(is_docs_path("/swagger/v1/swagger.json"));
/// assert!(!is_docs_path("/swaggers"));
/// ```
pub fn is_docs_path(path: &str) -> bool {
    path.strip_prefix(SWAGGER_UI_PATH)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "BookStore API",
        version = "v1",
        description = "CRUD access to the book catalog and its categories."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::get_category,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::update_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::list_books_by_category,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::update_book,
        crate::inbound::http::books::delete_book,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        BookRequest,
        BookResponse,
        CategoryRequest,
        CategoryResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "books", description = "Books in the catalog"),
        (name = "categories", description = "Categories owning books"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
