//! Port for applying versioned schema migrations.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while inspecting or applying migrations.
    pub enum MigrationError {
        /// The store could not be reached.
        Connection { message: String } =>
            "migration connection failed: {message}",
        /// A migration step failed; earlier steps stay applied.
        Apply { message: String } =>
            "migration failed: {message}",
    }
}

/// Port for bringing the store schema up to date.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaMigrator: Send + Sync {
    /// Apply pending migrations in ascending version order and return the
    /// versions applied. Empty when the store is already current.
    async fn migrate(&self) -> Result<Vec<String>, MigrationError>;

    /// Versions known to the binary but not yet applied.
    async fn pending(&self) -> Result<Vec<String>, MigrationError>;
}

/// Fixture implementation for a store that is always up to date.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSchemaMigrator;

#[async_trait]
impl SchemaMigrator for FixtureSchemaMigrator {
    async fn migrate(&self) -> Result<Vec<String>, MigrationError> {
        Ok(Vec::new())
    }

    async fn pending(&self) -> Result<Vec<String>, MigrationError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_is_up_to_date() {
        let migrator = FixtureSchemaMigrator;
        assert!(migrator.migrate().await.expect("migrate").is_empty());
        assert!(migrator.pending().await.expect("pending").is_empty());
    }

    #[rstest]
    fn apply_error_formats_message() {
        let err = MigrationError::apply("relation \"books\" already exists");
        assert!(err.to_string().starts_with("migration failed:"));
    }
}
