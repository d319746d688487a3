//! Design-time migration tool.
//!
//! Reads `appsettings.json` from the base directory (the working directory by
//! default) and applies or lists schema migrations against that database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::path::PathBuf;

use bookstore::outbound::persistence::BookStoreContextFactory;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use tokio::runtime::Builder;

/// `bookstore-migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bookstore-migrate",
    about = "Apply or inspect BookStore schema migrations",
    version
)]
struct CliArgs {
    /// Directory containing `appsettings.json`.
    #[arg(long = "base-dir", value_name = "path", default_value = ".")]
    base_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Apply every pending migration.
    Apply,
    /// List migrations not yet applied.
    Status,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let factory = BookStoreContextFactory::new(args.base_dir);
    let context = factory
        .create()
        .wrap_err_with(|| format!("load {}", factory.settings_path().display()))?;

    match args.command {
        Command::Apply => {
            let applied = context.migrate().await.wrap_err("apply migrations")?;
            if applied.is_empty() {
                println!("database {} is up to date", context.config().database());
            }
            for version in applied {
                println!("applied {version}");
            }
        }
        Command::Status => {
            let pending = context
                .pending_migrations()
                .await
                .wrap_err("list pending migrations")?;
            if pending.is_empty() {
                println!("no pending migrations");
            }
            for version in pending {
                println!("pending {version}");
            }
        }
    }
    Ok(())
}
