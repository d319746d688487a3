//! Port for category persistence.

use async_trait::async_trait;

use crate::domain::{Category, CategoryDraft, EntityId, Error};

use super::define_port_error;

define_port_error! {
    /// Errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "category repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "category repository query failed: {message}",
        /// The category still owns books and cannot be removed.
        InUse { category_id: i32 } =>
            "category {category_id} still has books",
    }
}

impl From<CategoryRepositoryError> for Error {
    fn from(error: CategoryRepositoryError) -> Self {
        match error {
            CategoryRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("category repository unavailable: {message}"))
            }
            CategoryRepositoryError::Query { message } => {
                Error::internal(format!("category repository error: {message}"))
            }
            CategoryRepositoryError::InUse { category_id } => {
                Error::conflict(format!("category {category_id} still has books"))
            }
        }
    }
}

/// Port for reading and writing categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List every category ordered by id.
    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError>;

    /// Find a category by id.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Insert a new category and return it with its store-assigned id.
    async fn insert(&self, draft: &CategoryDraft) -> Result<Category, CategoryRepositoryError>;

    /// Rename an existing category. `None` when no row matched.
    async fn update(
        &self,
        id: EntityId,
        draft: &CategoryDraft,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Delete a category, returning whether a row was removed.
    async fn delete(&self, id: EntityId) -> Result<bool, CategoryRepositoryError>;
}

/// Fixture implementation for tests that do not exercise category persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryRepository;

#[async_trait]
impl CategoryRepository for FixtureCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: EntityId) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, draft: &CategoryDraft) -> Result<Category, CategoryRepositoryError> {
        Category::new(EntityId::new(1), draft.clone())
            .map_err(|err| CategoryRepositoryError::query(err.to_string()))
    }

    async fn update(
        &self,
        _id: EntityId,
        _draft: &CategoryDraft,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: EntityId) -> Result<bool, CategoryRepositoryError> {
        Ok(false)
    }
}
