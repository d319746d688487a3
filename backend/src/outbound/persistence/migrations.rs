//! Embedded schema migrations and the Diesel-backed migrator.
//!
//! `diesel_migrations` only drives synchronous connections, so each call
//! opens a dedicated `PgConnection` on a blocking thread. Every migration
//! runs in its own transaction; a failing step leaves earlier ones applied.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::{Connection, migration::Migration};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::{MigrationError, SchemaMigrator};

/// Migrations compiled into the binary from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs [`MIGRATIONS`] against a PostgreSQL database.
#[derive(Debug, Clone)]
pub struct DieselSchemaMigrator {
    database_url: String,
}

impl DieselSchemaMigrator {
    /// Create a migrator for the given connection URL.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T, MigrationError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, MigrationError> + Send + 'static,
    {
        let url = self.database_url.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = PgConnection::establish(&url)
                .map_err(|err| MigrationError::connection(err.to_string()))?;
            op(&mut conn)
        })
        .await
        .map_err(|err| MigrationError::apply(format!("migration task failed: {err}")))?
    }
}

#[async_trait]
impl SchemaMigrator for DieselSchemaMigrator {
    async fn migrate(&self) -> Result<Vec<String>, MigrationError> {
        let applied = self
            .with_connection(|conn| {
                conn.run_pending_migrations(MIGRATIONS)
                    .map(|versions| versions.iter().map(ToString::to_string).collect::<Vec<_>>())
                    .map_err(|err| MigrationError::apply(err.to_string()))
            })
            .await?;
        info!(count = applied.len(), versions = ?applied, "schema migrations applied");
        Ok(applied)
    }

    async fn pending(&self) -> Result<Vec<String>, MigrationError> {
        self.with_connection(|conn| {
            conn.pending_migrations(MIGRATIONS)
                .map(|pending| {
                    pending
                        .iter()
                        .map(|migration| migration.name().version().to_string())
                        .collect()
                })
                .map_err(|err| MigrationError::apply(err.to_string()))
        })
        .await
    }
}
