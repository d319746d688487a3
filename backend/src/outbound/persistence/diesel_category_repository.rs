//! PostgreSQL-backed `CategoryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, CategoryDraft, EntityId};

use super::diesel_error_mapping::{
    is_book_category_violation, map_basic_diesel_error, map_pool_error,
};
use super::models::{CategoryChanges, CategoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::categories;

/// Diesel-backed implementation of the category repository port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CategoryRepositoryError {
    map_pool_error(error, CategoryRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> CategoryRepositoryError {
    map_basic_diesel_error(
        error,
        CategoryRepositoryError::query,
        CategoryRepositoryError::connection,
    )
}

fn to_domain(row: CategoryRow) -> Result<Category, CategoryRepositoryError> {
    Category::try_from(row).map_err(|err| CategoryRepositoryError::query(err.to_string()))
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<CategoryRow> = categories::table
            .order(categories::id.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = categories::table
            .filter(categories::id.eq(id.get()))
            .select(CategoryRow::as_select())
            .first::<CategoryRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(to_domain).transpose()
    }

    async fn insert(&self, draft: &CategoryDraft) -> Result<Category, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = diesel::insert_into(categories::table)
            .values(CategoryChanges::from(draft))
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        to_domain(row)
    }

    async fn update(
        &self,
        id: EntityId,
        draft: &CategoryDraft,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = diesel::update(categories::table.filter(categories::id.eq(id.get())))
            .set(CategoryChanges::from(draft))
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(to_domain).transpose()
    }

    async fn delete(&self, id: EntityId) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let deleted = diesel::delete(categories::table.filter(categories::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_book_category_violation(&err) {
                    CategoryRepositoryError::in_use(id.get())
                } else {
                    map_diesel(err)
                }
            })?;
        Ok(deleted > 0)
    }
}
