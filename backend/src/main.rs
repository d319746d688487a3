//! Backend entry-point: runs the boot sequence and serves until stopped.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use bookstore::bootstrap::{boot, construct_services};
use bookstore::inbound::http::health::HealthState;
use bookstore::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let registry = construct_services(&settings)?;

    let health_state = web::Data::new(HealthState::new());
    let booted = boot(&registry, health_state).await?;
    booted.server.await
}
