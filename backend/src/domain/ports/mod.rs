//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod book_repository;
mod category_repository;
mod schema_migrator;

#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError, FixtureBookRepository};
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::{
    CategoryRepository, CategoryRepositoryError, FixtureCategoryRepository,
};
#[cfg(test)]
pub use schema_migrator::MockSchemaMigrator;
pub use schema_migrator::{FixtureSchemaMigrator, MigrationError, SchemaMigrator};
