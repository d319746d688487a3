//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel models and
//! domain types. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module. Connections come from a
//! `bb8` pool through `diesel-async`; migrations use a synchronous
//! connection on a blocking thread.
//!
//! # Example
//!
//! ```no_run
//! use bookstore::outbound::persistence::{BookStoreContext, ConnectionConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectionConfig::parse("postgres://localhost/bookstore")?;
//! let context = BookStoreContext::new(config);
//! let applied = context.migrate().await?;
//! println!("applied {applied:?}");
//! # Ok(())
//! # }
//! ```

mod context;
mod context_factory;
mod diesel_book_repository;
mod diesel_category_repository;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use context::{BookStoreContext, ConnectionConfig, ConnectionConfigError};
pub use context_factory::{
    BookStoreContextFactory, ContextFactoryError, SETTINGS_FILE_NAME, load_connection_string,
};
pub use diesel_book_repository::DieselBookRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use migrations::{DieselSchemaMigrator, MIGRATIONS};
pub use pool::{DbPool, PoolConfig, PoolError};
