//! Port for book persistence.

use async_trait::async_trait;

use crate::domain::{Book, BookDraft, EntityId, Error};

use super::define_port_error;

define_port_error! {
    /// Errors raised by book repository adapters.
    pub enum BookRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "book repository query failed: {message}",
        /// The referenced category does not exist.
        UnknownCategory { category_id: i32 } =>
            "category {category_id} does not exist",
    }
}

impl From<BookRepositoryError> for Error {
    fn from(error: BookRepositoryError) -> Self {
        match error {
            BookRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("book repository unavailable: {message}"))
            }
            BookRepositoryError::Query { message } => {
                Error::internal(format!("book repository error: {message}"))
            }
            BookRepositoryError::UnknownCategory { category_id } => {
                Error::invalid_request(format!("category {category_id} does not exist"))
                    .with_details(serde_json::json!({ "field": "categoryId" }))
            }
        }
    }
}

/// Port for reading and writing books.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// List every book ordered by id.
    async fn list(&self) -> Result<Vec<Book>, BookRepositoryError>;

    /// Find a book by id.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Book>, BookRepositoryError>;

    /// List the books owned by a category, ordered by id.
    async fn list_by_category(
        &self,
        category_id: EntityId,
    ) -> Result<Vec<Book>, BookRepositoryError>;

    /// Insert a new book and return it with its store-assigned id.
    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError>;

    /// Replace the contents of an existing book. `None` when no row matched.
    async fn update(
        &self,
        id: EntityId,
        draft: &BookDraft,
    ) -> Result<Option<Book>, BookRepositoryError>;

    /// Delete a book, returning whether a row was removed.
    async fn delete(&self, id: EntityId) -> Result<bool, BookRepositoryError>;
}

/// Fixture implementation for tests that do not exercise book persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookRepository;

#[async_trait]
impl BookRepository for FixtureBookRepository {
    async fn list(&self) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: EntityId) -> Result<Option<Book>, BookRepositoryError> {
        Ok(None)
    }

    async fn list_by_category(
        &self,
        _category_id: EntityId,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        Err(BookRepositoryError::unknown_category(
            draft.category_id.get(),
        ))
    }

    async fn update(
        &self,
        _id: EntityId,
        _draft: &BookDraft,
    ) -> Result<Option<Book>, BookRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: EntityId) -> Result<bool, BookRepositoryError> {
        Ok(false)
    }
}
