//! Builds a [`BookStoreContext`] for design-time tooling.
//!
//! Tooling runs outside the service, so the factory reads the same
//! `appsettings.json` the service uses, relative to a base directory
//! (the working directory by default).

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;

use super::context::{BookStoreContext, ConnectionConfig, ConnectionConfigError};

/// File name of the settings document.
pub const SETTINGS_FILE_NAME: &str = "appsettings.json";

/// Errors raised while reading the settings document.
#[derive(Debug, Error)]
pub enum ContextFactoryError {
    /// Settings file could not be read.
    #[error("failed to read settings at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Settings file is not valid JSON.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// `ConnectionStrings.DefaultConnection` is absent or blank.
    #[error("ConnectionStrings.DefaultConnection is missing from {path}")]
    MissingConnectionString { path: PathBuf },
    /// The connection string is present but unusable.
    #[error("invalid connection string: {0}")]
    InvalidConnection(#[from] ConnectionConfigError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SettingsDocument {
    connection_strings: Option<ConnectionStrings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConnectionStrings {
    default_connection: Option<String>,
}

/// Read `ConnectionStrings.DefaultConnection` from a settings file.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use bookstore::outbound::persistence::load_connection_string;
///
/// let raw = load_connection_string(Path::new("appsettings.json"))?;
/// # Ok::<(), bookstore::outbound::persistence::ContextFactoryError>(())
/// ```
pub fn load_connection_string(path: &Path) -> Result<String, ContextFactoryError> {
    let read_error = |source: std::io::Error| ContextFactoryError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "settings path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;

    let document: SettingsDocument =
        serde_json::from_str(&contents).map_err(|source| ContextFactoryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    document
        .connection_strings
        .and_then(|strings| strings.default_connection)
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| ContextFactoryError::MissingConnectionString {
            path: path.to_path_buf(),
        })
}

/// Design-time factory for [`BookStoreContext`].
#[derive(Debug, Clone)]
pub struct BookStoreContextFactory {
    base_dir: PathBuf,
}

impl Default for BookStoreContextFactory {
    fn default() -> Self {
        Self::new(".")
    }
}

impl BookStoreContextFactory {
    /// Factory reading settings from `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Location of the settings document.
    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE_NAME)
    }

    /// Read the settings and build a context configured like the service's.
    ///
    /// Must be called inside a Tokio runtime; see [`BookStoreContext::new`].
    pub fn create(&self) -> Result<BookStoreContext, ContextFactoryError> {
        let raw = load_connection_string(&self.settings_path())?;
        let config = ConnectionConfig::parse(&raw)?;
        Ok(BookStoreContext::new(config))
    }
}
