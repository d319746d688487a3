//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BookRepository, CategoryRepository, FixtureBookRepository, FixtureCategoryRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub books: Arc<dyn BookRepository>,
    pub categories: Arc<dyn CategoryRepository>,
}

impl HttpState {
    /// Construct state from repository ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use bookstore::domain::ports::{FixtureBookRepository, FixtureCategoryRepository};
    /// use bookstore::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureBookRepository),
    ///     Arc::new(FixtureCategoryRepository),
    /// );
    /// let _books = state.books.clone();
    /// ```
    pub fn new(
        books: Arc<dyn BookRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self { books, categories }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureBookRepository),
            Arc::new(FixtureCategoryRepository),
        )
    }
}
