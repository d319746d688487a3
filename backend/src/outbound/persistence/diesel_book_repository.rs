//! PostgreSQL-backed `BookRepository` implementation using Diesel ORM.
//!
//! Rows are converted through the validated domain constructors; a row that
//! no longer satisfies them is reported as a query error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{Book, BookDraft, EntityId};

use super::diesel_error_mapping::{
    is_book_category_violation, map_basic_diesel_error, map_pool_error,
};
use super::models::{BookChanges, BookRow};
use super::pool::{DbPool, PoolError};
use super::schema::books;

/// Diesel-backed implementation of the book repository port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> BookRepositoryError {
    map_pool_error(error, BookRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> BookRepositoryError {
    map_basic_diesel_error(
        error,
        BookRepositoryError::query,
        BookRepositoryError::connection,
    )
}

/// Map write errors, turning a category foreign key violation into
/// [`BookRepositoryError::UnknownCategory`].
fn map_write(error: diesel::result::Error, draft: &BookDraft) -> BookRepositoryError {
    if is_book_category_violation(&error) {
        BookRepositoryError::unknown_category(draft.category_id.get())
    } else {
        map_diesel(error)
    }
}

fn to_domain(row: BookRow) -> Result<Book, BookRepositoryError> {
    Book::try_from(row).map_err(|err| BookRepositoryError::query(err.to_string()))
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn list(&self) -> Result<Vec<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<BookRow> = books::table
            .order(books::id.asc())
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = books::table
            .filter(books::id.eq(id.get()))
            .select(BookRow::as_select())
            .first::<BookRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(to_domain).transpose()
    }

    async fn list_by_category(
        &self,
        category_id: EntityId,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<BookRow> = books::table
            .filter(books::category_id.eq(category_id.get()))
            .order(books::id.asc())
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = diesel::insert_into(books::table)
            .values(BookChanges::from(draft))
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write(err, draft))?;
        to_domain(row)
    }

    async fn update(
        &self,
        id: EntityId,
        draft: &BookDraft,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = diesel::update(books::table.filter(books::id.eq(id.get())))
            .set(BookChanges::from(draft))
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write(err, draft))?;
        row.map(to_domain).transpose()
    }

    async fn delete(&self, id: EntityId) -> Result<bool, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let deleted = diesel::delete(books::table.filter(books::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(deleted > 0)
    }
}
