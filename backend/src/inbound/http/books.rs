//! Book endpoints.
//!
//! ```text
//! GET    /api/books
//! GET    /api/books/{id}
//! GET    /api/books/get-books-by-category/{categoryId}
//! POST   /api/books
//! PUT    /api/books/{id}
//! DELETE /api/books/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Book, BookDraft, Entity, EntityId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::resource::{created, ensure_matching_id, missing};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const COLLECTION: &str = "/api/books";

/// Book as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "The Hobbit")]
    pub name: String,
    #[schema(example = "J. R. R. Tolkien")]
    pub author: String,
    pub description: String,
    /// Price.
    #[schema(example = 12.5)]
    pub value: f64,
    #[schema(example = "1937-09-21T00:00:00")]
    pub publish_date: NaiveDateTime,
    #[schema(example = 1)]
    pub category_id: i32,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id().get(),
            name: book.name().to_owned(),
            author: book.author().to_owned(),
            description: book.description().to_owned(),
            value: book.value(),
            publish_date: book.publish_date(),
            category_id: book.category_id().get(),
        }
    }
}

/// Book create/update payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    /// Ignored on create; must match the path on update when present.
    #[serde(default)]
    pub id: Option<i32>,
    #[schema(max_length = 150)]
    pub name: String,
    #[schema(max_length = 150)]
    pub author: String,
    #[serde(default)]
    #[schema(max_length = 350)]
    pub description: String,
    #[schema(minimum = 0.0)]
    pub value: f64,
    pub publish_date: NaiveDateTime,
    pub category_id: i32,
}

impl BookRequest {
    fn into_draft(self) -> Result<BookDraft, Error> {
        let draft = BookDraft {
            name: self.name,
            author: self.author,
            description: self.description,
            value: self.value,
            publish_date: self.publish_date,
            category_id: EntityId::new(self.category_id),
        };
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(draft)
    }
}

fn to_responses(books: &[Book]) -> Vec<BookResponse> {
    books.iter().map(BookResponse::from).collect()
}

/// List all books.
#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "All books", body = [BookResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "listBooks"
)]
#[get("/books")]
pub async fn list_books(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<BookResponse>>> {
    let books = state.books.list().await?;
    Ok(web::Json(to_responses(&books)))
}

/// Fetch one book.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book", body = BookResponse),
        (status = 404, description = "No such book", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "getBook"
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<BookResponse>> {
    let id = EntityId::new(path.into_inner());
    let book = state
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| missing::<Book>(id))?;
    Ok(web::Json(BookResponse::from(&book)))
}

/// List the books of one category. An unknown category yields an empty list.
#[utoipa::path(
    get,
    path = "/api/books/get-books-by-category/{categoryId}",
    params(("categoryId" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Books in the category", body = [BookResponse])
    ),
    tags = ["books"],
    operation_id = "listBooksByCategory"
)]
#[get("/books/get-books-by-category/{category_id}")]
pub async fn list_books_by_category(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    let category_id = EntityId::new(path.into_inner());
    let books = state.books.list_by_category(category_id).await?;
    Ok(web::Json(to_responses(&books)))
}

/// Create a book.
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = BookRequest,
    responses(
        (
            status = 201,
            description = "Book created",
            headers(("Location" = String, description = "URL of the new book")),
            body = BookResponse
        ),
        (status = 400, description = "Invalid payload or unknown category", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "createBook"
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let book = state.books.insert(&draft).await?;
    Ok(created(COLLECTION, &book, BookResponse::from(&book)))
}

/// Replace a book.
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (
            status = 400,
            description = "Invalid payload, id mismatch or unknown category",
            body = ErrorSchema
        ),
        (status = 404, description = "No such book", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "updateBook"
)]
#[put("/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<BookRequest>,
) -> ApiResult<web::Json<BookResponse>> {
    let id = EntityId::new(path.into_inner());
    let payload = payload.into_inner();
    ensure_matching_id(id, payload.id)?;
    let draft = payload.into_draft()?;
    let book = state
        .books
        .update(id, &draft)
        .await?
        .ok_or_else(|| missing::<Book>(id))?;
    Ok(web::Json(BookResponse::from(&book)))
}

/// Delete a book.
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "No such book", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "deleteBook"
)]
#[delete("/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = EntityId::new(path.into_inner());
    if state.books.delete(id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(missing::<Book>(id))
    }
}
