//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Entities are immutable once constructed; drafts carry
//! unsaved contents and are validated before the store sees them.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Book, Category — persisted entities implementing [`Entity`].
//! - TraceId — request-scoped correlation identifier.

pub mod book;
pub mod category;
pub mod entity;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::book::{
    BOOK_AUTHOR_MAX, BOOK_DESCRIPTION_MAX, BOOK_NAME_MAX, Book, BookDraft, BookValidationError,
};
pub use self::category::{CATEGORY_NAME_MAX, Category, CategoryDraft, CategoryValidationError};
pub use self::entity::{Entity, EntityId, not_found_message};
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bookstore::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
