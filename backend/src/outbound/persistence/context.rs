//! The persistence context: connection configuration, pool, and migrations.
//!
//! A [`BookStoreContext`] owns the entity/schema mapping for books and
//! categories. It is a cheap clone over one shared pool; each repository
//! call checks out its own connection and releases it when the call ends.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::domain::ports::{MigrationError, SchemaMigrator};

use super::diesel_book_repository::DieselBookRepository;
use super::diesel_category_repository::DieselCategoryRepository;
use super::migrations::DieselSchemaMigrator;
use super::pool::{DbPool, PoolConfig};

/// Errors raised while validating a connection string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionConfigError {
    #[error("connection string is empty")]
    Empty,
    #[error("connection string is not a valid URL: {message}")]
    Malformed { message: String },
    #[error("unsupported connection scheme `{scheme}`; expected postgres or postgresql")]
    UnsupportedScheme { scheme: String },
    #[error("connection string has no host")]
    MissingHost,
    #[error("connection string has no database name")]
    MissingDatabase,
}

/// Validated PostgreSQL connection configuration.
///
/// # Examples
/// ```
/// use bookstore::outbound::persistence::ConnectionConfig;
///
/// let config = ConnectionConfig::parse("postgres://app:secret@db:5432/bookstore")
///     .expect("valid connection string");
/// assert_eq!(config.database(), "bookstore");
/// assert_eq!(config.redacted(), "postgres://app:***@db:5432/bookstore");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    url: Url,
}

impl ConnectionConfig {
    /// Parse and validate a connection string.
    pub fn parse(raw: &str) -> Result<Self, ConnectionConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConnectionConfigError::Empty);
        }
        let url = Url::parse(trimmed).map_err(|err| ConnectionConfigError::Malformed {
            message: err.to_string(),
        })?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(ConnectionConfigError::UnsupportedScheme {
                scheme: url.scheme().to_owned(),
            });
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConnectionConfigError::MissingHost);
        }
        if url.path().trim_start_matches('/').is_empty() {
            return Err(ConnectionConfigError::MissingDatabase);
        }
        Ok(Self { url })
    }

    /// Full connection URL, credentials included.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Database name taken from the URL path.
    pub fn database(&self) -> &str {
        self.url.path().trim_start_matches('/')
    }

    /// Connection URL with the password masked, for logs.
    pub fn redacted(&self) -> String {
        let mut url = self.url.clone();
        if url.password().is_some() {
            // Only fails for URLs that cannot carry credentials; checked above.
            let _ = url.set_password(Some("***"));
        }
        url.to_string()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionConfig")
            .field(&self.redacted())
            .finish()
    }
}

/// Persistence context shared by the service and design-time tooling.
#[derive(Clone)]
pub struct BookStoreContext {
    config: ConnectionConfig,
    pool: DbPool,
    migrator: Arc<dyn SchemaMigrator>,
}

impl BookStoreContext {
    /// Build a context with the default pool settings.
    ///
    /// Does not contact the database. Must be called inside a Tokio runtime.
    pub fn new(config: ConnectionConfig) -> Self {
        let pool_config = PoolConfig::new(config.as_str());
        Self::with_pool_config(config, pool_config)
    }

    /// Build a context with explicit pool settings.
    pub fn with_pool_config(config: ConnectionConfig, pool_config: PoolConfig) -> Self {
        let pool = DbPool::new(pool_config);
        let migrator = Arc::new(DieselSchemaMigrator::new(config.as_str()));
        Self {
            config,
            pool,
            migrator,
        }
    }

    /// Replace the migrator, e.g. with a fixture in tests.
    pub fn with_migrator(mut self, migrator: Arc<dyn SchemaMigrator>) -> Self {
        self.migrator = migrator;
        self
    }

    /// Connection configuration the context was built from.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Shared connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Book repository over this context's pool.
    pub fn books(&self) -> DieselBookRepository {
        DieselBookRepository::new(self.pool.clone())
    }

    /// Category repository over this context's pool.
    pub fn categories(&self) -> DieselCategoryRepository {
        DieselCategoryRepository::new(self.pool.clone())
    }

    /// Apply pending migrations, returning the versions applied.
    pub async fn migrate(&self) -> Result<Vec<String>, MigrationError> {
        self.migrator.migrate().await
    }

    /// Versions not yet applied to the store.
    pub async fn pending_migrations(&self) -> Result<Vec<String>, MigrationError> {
        self.migrator.pending().await
    }
}

impl fmt::Debug for BookStoreContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookStoreContext")
            .field("config", &self.config)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
