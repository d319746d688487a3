//! Pipeline helpers shared by HTTP integration tests.
//!
//! The registry is built around a context pointing at a closed port, so
//! nothing touches a database unless a test swaps in real adapters.

use std::sync::Arc;

use async_trait::async_trait;
use bookstore::domain::ports::{
    BookRepository, BookRepositoryError, FixtureCategoryRepository, FixtureSchemaMigrator,
};
use bookstore::domain::{Book, BookDraft, EntityId};
use bookstore::inbound::http::state::HttpState;
use bookstore::outbound::persistence::{BookStoreContext, ConnectionConfig};
use bookstore::registry::{HostOptions, ServiceRegistry};

/// Connection string for a store that is never reachable.
pub const UNREACHABLE_URL: &str = "postgres://app@127.0.0.1:9/bookstore";

/// Build a registry with fixture ports. Call inside a Tokio runtime.
pub fn fixture_registry(host: HostOptions) -> ServiceRegistry {
    let config = ConnectionConfig::parse(UNREACHABLE_URL).expect("valid connection string");
    let context = BookStoreContext::new(config).with_migrator(Arc::new(FixtureSchemaMigrator));
    ServiceRegistry::from_context(context, host).with_http_state(HttpState::default())
}

/// Book repository whose every call fails with a query error.
pub struct BrokenBookRepository;

impl BrokenBookRepository {
    fn failure() -> BookRepositoryError {
        BookRepositoryError::query("disk on fire")
    }
}

#[async_trait]
impl BookRepository for BrokenBookRepository {
    async fn list(&self) -> Result<Vec<Book>, BookRepositoryError> {
        Err(Self::failure())
    }

    async fn find_by_id(&self, _id: EntityId) -> Result<Option<Book>, BookRepositoryError> {
        Err(Self::failure())
    }

    async fn list_by_category(
        &self,
        _category_id: EntityId,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        Err(Self::failure())
    }

    async fn insert(&self, _draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        Err(Self::failure())
    }

    async fn update(
        &self,
        _id: EntityId,
        _draft: &BookDraft,
    ) -> Result<Option<Book>, BookRepositoryError> {
        Err(Self::failure())
    }

    async fn delete(&self, _id: EntityId) -> Result<bool, BookRepositoryError> {
        Err(Self::failure())
    }
}

/// Handler state whose book port always fails.
pub fn broken_books_state() -> HttpState {
    HttpState::new(
        Arc::new(BrokenBookRepository),
        Arc::new(FixtureCategoryRepository),
    )
}
