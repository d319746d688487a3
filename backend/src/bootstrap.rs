//! Startup sequence.
//!
//! The service boots in four fixed phases: service construction, migration,
//! pipeline assembly, listen. Construction failures are fatal and stop the
//! process before it listens. A migration failure is recoverable: it is
//! logged and printed, then the sequence carries on.

use std::fmt;

use actix_web::dev::Server;
use actix_web::web;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::ports::MigrationError;
use crate::inbound::http::health::HealthState;
use crate::outbound::persistence::BookStoreContext;
use crate::registry::ServiceRegistry;
use crate::server::{ServerConfig, create_server};
use crate::settings::{AppSettings, SettingsError};

/// Phases of the startup sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    /// Settings loaded and the registry built.
    ServiceConstruction,
    /// Pending schema migrations attempted.
    Migration,
    /// Middleware chain assembled.
    PipelineAssembly,
    /// Listener bound.
    Listen,
}

impl fmt::Display for BootPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ServiceConstruction => "service construction",
            Self::Migration => "migration",
            Self::PipelineAssembly => "pipeline assembly",
            Self::Listen => "listen",
        })
    }
}

/// Errors that stop the process before it listens.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Settings or connection configuration are missing or malformed.
    #[error("service construction failed: {0}")]
    Fatal(#[from] SettingsError),
    /// The listener could not be bound.
    #[error("failed to bind listener: {0}")]
    Listen(#[source] std::io::Error),
}

impl From<StartupError> for std::io::Error {
    fn from(value: StartupError) -> Self {
        match value {
            StartupError::Listen(source) => source,
            fatal @ StartupError::Fatal(_) => Self::other(fatal),
        }
    }
}

/// Result of the migration phase. Never stops the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// These versions were applied, in ascending order.
    Applied(Vec<String>),
    /// Nothing was pending.
    UpToDate,
    /// Migration failed; the error has already been reported.
    Failed(MigrationError),
}

impl MigrationOutcome {
    /// Whether the migration phase reported an error.
    ///
    /// # Examples
    /// ```
    /// use bookstore::bootstrap::MigrationOutcome;
    /// use bookstore::domain::ports::MigrationError;
    ///
    /// assert!(MigrationOutcome::Failed(MigrationError::connection("refused")).is_failed());
    /// assert!(!MigrationOutcome::UpToDate.is_failed());
    /// ```
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// A server that has completed every boot phase.
pub struct Booted {
    pub server: Server,
    pub migration: MigrationOutcome,
    pub phases: Vec<BootPhase>,
}

impl fmt::Debug for Booted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Booted")
            .field("migration", &self.migration)
            .field("phases", &self.phases)
            .finish_non_exhaustive()
    }
}

/// Phase 1: build the composition root from settings.
///
/// # Errors
/// Returns [`StartupError::Fatal`] when the connection string is missing or
/// malformed, or a host option cannot be parsed.
pub fn construct_services(settings: &AppSettings) -> Result<ServiceRegistry, StartupError> {
    info!(phase = %BootPhase::ServiceConstruction, "boot phase started");
    let registry = ServiceRegistry::build(settings).map_err(|err| {
        error!(phase = %BootPhase::ServiceConstruction, error = %err, "service construction failed");
        StartupError::from(err)
    })?;
    info!(
        database = registry.context().config().database(),
        environment = %registry.host().environment,
        "services registered"
    );
    Ok(registry)
}

/// Phase 2: bring the schema up to date.
///
/// Failures are logged at error level and printed to standard output, then
/// returned as [`MigrationOutcome::Failed`] for the caller to ignore.
pub async fn run_migration_phase(context: &BookStoreContext) -> MigrationOutcome {
    info!(phase = %BootPhase::Migration, "boot phase started");
    match context.migrate().await {
        Ok(applied) if applied.is_empty() => {
            info!("schema already up to date");
            MigrationOutcome::UpToDate
        }
        Ok(applied) => {
            info!(count = applied.len(), versions = ?applied, "migrations applied");
            MigrationOutcome::Applied(applied)
        }
        Err(err) => {
            error!(error = %err, "an error occurred while migrating the database");
            println!("An error occurred while migrating the database: {err}");
            MigrationOutcome::Failed(err)
        }
    }
}

/// Run phases 2 to 4 for an already constructed registry.
///
/// Readiness is flipped once the listener is bound. The returned server
/// must be awaited to serve traffic.
///
/// # Errors
/// Returns [`StartupError::Listen`] when the socket cannot be bound.
pub async fn boot(
    registry: &ServiceRegistry,
    health_state: web::Data<HealthState>,
) -> Result<Booted, StartupError> {
    let mut phases = vec![BootPhase::ServiceConstruction];

    let migration = run_migration_phase(registry.context()).await;
    phases.push(BootPhase::Migration);

    info!(phase = %BootPhase::PipelineAssembly, "boot phase started");
    let config = ServerConfig::from_registry(registry);
    phases.push(BootPhase::PipelineAssembly);

    info!(phase = %BootPhase::Listen, bind_addr = %config.bind_addr(), "boot phase started");
    let server = create_server(health_state.clone(), config).map_err(StartupError::Listen)?;
    phases.push(BootPhase::Listen);
    health_state.mark_ready();

    Ok(Booted {
        server,
        migration,
        phases,
    })
}
